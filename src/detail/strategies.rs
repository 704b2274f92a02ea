//! Markup and structured-data strategies for cinema detail pages.
//!
//! Year chain, highest priority first: structured data, `Release Date:`
//! label, `(YYYY)` in the title, labelled description regions, generic
//! paragraph/span scan. Genre chain: structured data, first comma block,
//! fixed vocabulary. Rating chain: structured data only.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use super::DetailPage;
use crate::resolve::text::{element_text, first_year};
use crate::resolve::{Strategy, YearWindow};

/// Canonical genre names recognised by [`GenreVocabulary`].
pub const GENRE_VOCABULARY: &[&str] = &[
    "Action",
    "Comedy",
    "Drama",
    "Thriller",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Fantasy",
    "Adventure",
    "Crime",
    "Mystery",
    "Animation",
    "Documentary",
    "Family",
    "War",
    "Western",
    "Musical",
    "Biography",
    "History",
    "Sport",
];

/// Scanned text blocks must be shorter than this (in bytes).
const SCAN_TEXT_LIMIT: usize = 200;
/// Comma-delimited genre blocks must be shorter than this (in bytes).
const GENRE_BLOCK_LIMIT: usize = 100;
/// Vocabulary tokens must be shorter than this (in bytes).
const GENRE_TOKEN_LIMIT: usize = 20;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static P: Lazy<Selector> = Lazy::new(|| selector("p"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static GENRE_BLOCK: Lazy<Selector> = Lazy::new(|| selector(".event-top-desc-cont span"));
static GENRE_TOKEN: Lazy<Selector> = Lazy::new(|| selector("span, div"));
static TITLE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d{4})\)").expect("static title-year pattern"));

/// Description regions checked before the generic scan.
static DESCRIPTION_REGIONS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".movie-details", ".event-description", ".movie-info"]
        .into_iter()
        .map(selector)
        .collect()
});

/// Regions for the last-resort scan, in order.
static GENERIC_REGIONS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        ".event-top-desc-cont",
        ".movie-description",
        ".event-description",
        "p",
        "span",
    ]
    .into_iter()
    .map(selector)
    .collect()
});

// ─── Structured data ─────────────────────────────────────────────────────────

/// Year from an authoritative structured-data payload.
pub struct PayloadYear;

impl Strategy<DetailPage> for PayloadYear {
    type Output = i32;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &DetailPage) -> Option<i32> {
        page.authoritative_payload()?.year
    }
}

/// Genres from an authoritative structured-data payload.
pub struct PayloadGenres;

impl Strategy<DetailPage> for PayloadGenres {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &DetailPage) -> Option<Vec<String>> {
        let genres = &page.authoritative_payload()?.genres;
        (!genres.is_empty()).then(|| genres.clone())
    }
}

/// Rating from an authoritative structured-data payload.
pub struct PayloadRating;

impl Strategy<DetailPage> for PayloadRating {
    type Output = f64;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &DetailPage) -> Option<f64> {
        page.authoritative_payload()?.rating
    }
}

// ─── Year markup ─────────────────────────────────────────────────────────────

/// Last `span` of the first paragraph labelled `Release Date:`.
pub struct ReleaseDateLabel;

impl Strategy<DetailPage> for ReleaseDateLabel {
    type Output = i32;

    fn name(&self) -> &'static str {
        "release-date-label"
    }

    fn attempt(&self, page: &DetailPage) -> Option<i32> {
        let paragraph = page
            .document()
            .select(&P)
            .find(|p| element_text(*p).contains("Release Date:"))?;
        let value = paragraph.select(&SPAN).last()?;
        first_year(&element_text(value))
    }
}

/// `(YYYY)` inside the page title.
pub struct TitleParenthesis;

impl Strategy<DetailPage> for TitleParenthesis {
    type Output = i32;

    fn name(&self) -> &'static str {
        "title-parenthesis"
    }

    fn attempt(&self, page: &DetailPage) -> Option<i32> {
        TITLE_YEAR
            .captures(page.title())
            .and_then(|caps| caps[1].parse().ok())
    }
}

/// Short description regions, and paragraphs/spans labelled `Year:` or
/// `Released:`, carrying a plausible year next to a label or parenthesis.
pub struct DescriptionRegions {
    window: YearWindow,
}

impl DescriptionRegions {
    pub fn new(window: YearWindow) -> Self {
        Self { window }
    }
}

impl Strategy<DetailPage> for DescriptionRegions {
    type Output = i32;

    fn name(&self) -> &'static str {
        "description-regions"
    }

    fn attempt(&self, page: &DetailPage) -> Option<i32> {
        let document = page.document();

        let regions = DESCRIPTION_REGIONS
            .iter()
            .flat_map(|sel| document.select(sel))
            .map(element_text);
        let labelled = [&*P, &*SPAN].into_iter().flat_map(|sel| {
            ["Year:", "Released:"].into_iter().flat_map(move |label| {
                document
                    .select(sel)
                    .map(element_text)
                    .filter(move |text| text.contains(label))
            })
        });

        regions
            .chain(labelled)
            .filter(|text| text.len() < SCAN_TEXT_LIMIT)
            .filter(|text| {
                text.contains("Year") || text.contains("Released") || text.contains('(')
            })
            .find_map(|text| first_year(&text).filter(|y| self.window.contains(*y)))
    }
}

/// Last resort: any short region, paragraph or span mentioning `Year`,
/// `Release` or a parenthesis.
pub struct GenericScan {
    window: YearWindow,
}

impl GenericScan {
    pub fn new(window: YearWindow) -> Self {
        Self { window }
    }
}

impl Strategy<DetailPage> for GenericScan {
    type Output = i32;

    fn name(&self) -> &'static str {
        "generic-scan"
    }

    fn attempt(&self, page: &DetailPage) -> Option<i32> {
        let document = page.document();
        GENERIC_REGIONS
            .iter()
            .flat_map(|sel| document.select(sel))
            .map(element_text)
            .filter(|text| text.len() < SCAN_TEXT_LIMIT)
            .filter(|text| text.contains("Year") || text.contains("Release") || text.contains('('))
            .find_map(|text| first_year(&text).filter(|y| self.window.contains(*y)))
    }
}

// ─── Genre markup ────────────────────────────────────────────────────────────

/// First short comma-delimited block in the event header, split on commas.
pub struct CommaBlock;

impl Strategy<DetailPage> for CommaBlock {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "comma-block"
    }

    fn attempt(&self, page: &DetailPage) -> Option<Vec<String>> {
        let block = page
            .document()
            .select(&GENRE_BLOCK)
            .map(element_text)
            .find(|text| text.contains(',') && text.len() < GENRE_BLOCK_LIMIT)?;

        Some(
            block
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }
}

/// Short `span`/`div` texts that exactly name a known genre.
pub struct GenreVocabulary;

impl Strategy<DetailPage> for GenreVocabulary {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "vocabulary"
    }

    fn attempt(&self, page: &DetailPage) -> Option<Vec<String>> {
        let mut genres: Vec<String> = Vec::new();

        for text in page.document().select(&GENRE_TOKEN).map(element_text) {
            if text.is_empty() || text.len() >= GENRE_TOKEN_LIMIT {
                continue;
            }
            let Some(canonical) = GENRE_VOCABULARY
                .iter()
                .find(|g| g.eq_ignore_ascii_case(&text))
            else {
                continue;
            };
            if !genres.iter().any(|g| g == canonical) {
                genres.push((*canonical).to_string());
            }
        }

        (!genres.is_empty()).then_some(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> DetailPage {
        DetailPage::parse(&format!("<html><body>{body}</body></html>"))
    }

    fn window() -> YearWindow {
        YearWindow::ending(2026)
    }

    #[test]
    fn release_date_label_reads_last_span() {
        let page = page(
            r#"<p><span>Release Date:</span> <span>14.02.2019</span></p>"#,
        );
        assert_eq!(ReleaseDateLabel.attempt(&page), Some(2019));
    }

    #[test]
    fn release_date_label_missing_is_a_miss() {
        let page = page("<p><span>Duration:</span> <span>1h 52min</span></p>");
        assert_eq!(ReleaseDateLabel.attempt(&page), None);
    }

    #[test]
    fn title_parenthesis_reads_year() {
        let page = page(r#"<h1 class="list-item-desc-title">Example Movie (2019)</h1>"#);
        assert_eq!(TitleParenthesis.attempt(&page), Some(2019));
    }

    #[test]
    fn title_without_parenthesis_is_a_miss() {
        let page = page(r#"<h1 class="list-item-desc-title">Example Movie 2019</h1>"#);
        assert_eq!(TitleParenthesis.attempt(&page), None);
    }

    #[test]
    fn description_regions_need_a_label_or_parenthesis() {
        let strategy = DescriptionRegions::new(window());
        assert_eq!(
            strategy.attempt(&page(r#"<div class="movie-info">Shot on 35mm in 1985</div>"#)),
            None
        );
        assert_eq!(
            strategy.attempt(&page(r#"<div class="movie-info">Year: 1985</div>"#)),
            Some(1985)
        );
        assert_eq!(
            strategy.attempt(&page("<span>Released: 2003</span>")),
            Some(2003)
        );
    }

    #[test]
    fn description_regions_skip_implausible_years() {
        let strategy = DescriptionRegions::new(window());
        let page = page(
            r#"<div class="movie-details">Year: 1850</div>
               <div class="event-description">(2011)</div>"#,
        );
        assert_eq!(strategy.attempt(&page), Some(2011));
    }

    #[test]
    fn description_regions_ignore_long_text() {
        let strategy = DescriptionRegions::new(window());
        let long = format!("Year: 2001 {}", "x".repeat(220));
        let page = page(&format!(r#"<div class="movie-details">{long}</div>"#));
        assert_eq!(strategy.attempt(&page), None);
    }

    #[test]
    fn generic_scan_finds_release_mention() {
        let strategy = GenericScan::new(window());
        let page = page("<p>Cast: Someone</p><p>Release in cinemas 2024</p>");
        assert_eq!(strategy.attempt(&page), Some(2024));
    }

    #[test]
    fn generic_scan_rejects_out_of_window() {
        let strategy = GenericScan::new(window());
        let page = page("<p>Release 2099</p>");
        assert_eq!(strategy.attempt(&page), None);
    }

    #[test]
    fn comma_block_splits_and_trims() {
        let page = page(
            r#"<div class="event-top-desc-cont"><span>2h 10min</span>
               <span> Action, Comedy,  Drama </span></div>"#,
        );
        assert_eq!(
            CommaBlock.attempt(&page),
            Some(vec!["Action".into(), "Comedy".into(), "Drama".into()])
        );
    }

    #[test]
    fn comma_block_ignores_long_blocks() {
        let long = format!("Action, {}", "y".repeat(120));
        let page = page(&format!(
            r#"<div class="event-top-desc-cont"><span>{long}</span></div>"#
        ));
        assert_eq!(CommaBlock.attempt(&page), None);
    }

    #[test]
    fn vocabulary_matches_case_insensitively_and_dedupes() {
        let page = page(
            "<span>drama</span><div>Thriller</div><span>DRAMA</span><span>Not a genre</span>",
        );
        assert_eq!(
            GenreVocabulary.attempt(&page),
            Some(vec!["Drama".into(), "Thriller".into()])
        );
    }

    #[test]
    fn vocabulary_miss_is_none() {
        let page = page("<span>Tickets</span>");
        assert_eq!(GenreVocabulary.attempt(&page), None);
    }

    #[test]
    fn payload_strategies_ignore_non_authoritative_payloads() {
        let page = page(
            r#"<script type="application/ld+json">{"@type":"Movie","datePublished":"2015"}</script>"#,
        );
        assert_eq!(PayloadYear.attempt(&page), None);
        assert_eq!(PayloadRating.attempt(&page), None);
        assert_eq!(PayloadGenres.attempt(&page), None);
    }
}
