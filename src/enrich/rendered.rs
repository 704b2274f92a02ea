//! Rendered title-page provider.
//!
//! Loads `{title_base_url}{id}/` in a headless browser. The page's
//! structured-data payload is used as-is when it is authoritative; otherwise
//! rating, genres and year are read from the rendered DOM, each falling back
//! to whatever the payload did carry.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{Enrichment, RatingProvider};
use crate::render::RenderSession;
use crate::resolve::text::{element_text, first_year, leading_number};
use crate::resolve::{FieldChain, GenreField, RatingField, Strategy, YearField, YearWindow};
use crate::structured::{self, DecodedMetadata};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static RATING: Lazy<Selector> =
    Lazy::new(|| selector(r#"[data-testid="hero-rating-bar__aggregate-rating__score"] span"#));
static GENRES: Lazy<Selector> = Lazy::new(|| {
    selector(r#"[data-testid="genres"] a, [data-testid="genres"] span.ipc-chip__text"#)
});
static RELEASE: Lazy<Selector> = Lazy::new(|| {
    selector(
        r#"a[href*="releaseinfo"], a[data-testid="title-details-releasedate"], [data-testid="hero-title-block__metadata"] li a"#,
    )
});

/// A rendered title page and its decoded payload.
pub struct TitlePage {
    document: Html,
    payload: Option<DecodedMetadata>,
}

impl TitlePage {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let payload = structured::find_in_document(&document);
        Self { document, payload }
    }
}

struct DomRating;

impl Strategy<TitlePage> for DomRating {
    type Output = f64;

    fn name(&self) -> &'static str {
        "dom"
    }

    fn attempt(&self, page: &TitlePage) -> Option<f64> {
        let score = page.document.select(&RATING).next()?;
        leading_number(&element_text(score))
    }
}

struct DomGenres;

impl Strategy<TitlePage> for DomGenres {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "dom"
    }

    fn attempt(&self, page: &TitlePage) -> Option<Vec<String>> {
        let genres: Vec<String> = page
            .document
            .select(&GENRES)
            .map(element_text)
            .filter(|g| !g.is_empty())
            .collect();
        (!genres.is_empty()).then_some(genres)
    }
}

struct DomYear;

impl Strategy<TitlePage> for DomYear {
    type Output = i32;

    fn name(&self) -> &'static str {
        "dom"
    }

    fn attempt(&self, page: &TitlePage) -> Option<i32> {
        let release = page.document.select(&RELEASE).next()?;
        first_year(&element_text(release))
    }
}

/// Whatever the payload carried, authoritative or not.
struct PayloadFallback;

impl Strategy<TitlePage> for PayloadFallback {
    type Output = f64;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &TitlePage) -> Option<f64> {
        page.payload.as_ref()?.rating
    }
}

struct PayloadGenresFallback;

impl Strategy<TitlePage> for PayloadGenresFallback {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &TitlePage) -> Option<Vec<String>> {
        let genres = &page.payload.as_ref()?.genres;
        (!genres.is_empty()).then(|| genres.clone())
    }
}

struct PayloadYearFallback;

impl Strategy<TitlePage> for PayloadYearFallback {
    type Output = i32;

    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn attempt(&self, page: &TitlePage) -> Option<i32> {
        page.payload.as_ref()?.year
    }
}

/// Reads enrichment values out of rendered title pages.
pub struct TitlePageReader {
    year_field: YearField,
    rating: FieldChain<TitlePage, f64>,
    genres: FieldChain<TitlePage, Vec<String>>,
    year: FieldChain<TitlePage, i32>,
}

impl TitlePageReader {
    pub fn new(window: YearWindow) -> Self {
        Self {
            year_field: YearField::new(window),
            rating: FieldChain::new().then(DomRating).then(PayloadFallback),
            genres: FieldChain::new()
                .then(DomGenres)
                .then(PayloadGenresFallback),
            year: FieldChain::new().then(DomYear).then(PayloadYearFallback),
        }
    }

    pub fn read(&self, html: &str) -> Enrichment {
        let page = TitlePage::parse(html);

        if let Some(payload) = page.payload.as_ref().filter(|p| p.is_authoritative()) {
            return Enrichment {
                rating: payload.rating,
                year: payload.year,
                genres: payload.genres.clone(),
            };
        }

        Enrichment {
            rating: self.rating.resolve(&RatingField, &page).into_value(),
            year: self.year.resolve(&self.year_field, &page).into_value(),
            genres: self
                .genres
                .resolve(&GenreField, &page)
                .into_value()
                .unwrap_or_default(),
        }
    }
}

/// Rating provider that renders the external title page.
pub struct RenderedPageProvider {
    session: RenderSession,
    title_base_url: String,
    reader: TitlePageReader,
}

impl RenderedPageProvider {
    pub fn new(session: RenderSession, title_base_url: impl Into<String>, window: YearWindow) -> Self {
        Self {
            session,
            title_base_url: title_base_url.into(),
            reader: TitlePageReader::new(window),
        }
    }

    pub fn title_url(&self, external_id: &str) -> String {
        format!("{}{external_id}/", self.title_base_url)
    }
}

#[async_trait]
impl RatingProvider for RenderedPageProvider {
    fn name(&self) -> &'static str {
        "rendered"
    }

    async fn lookup(&self, external_id: &str) -> Result<Enrichment> {
        let html = self.session.page_html(&self.title_url(external_id)).await?;
        Ok(self.reader.read(&html))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::render::fake::StaticRenderer;
    use crate::render::Renderer;

    const BASE: &str = "https://title.example/title/";

    fn reader() -> TitlePageReader {
        TitlePageReader::new(YearWindow::ending(2026))
    }

    fn page(head: &str, body: &str) -> String {
        format!("<html><head>{head}</head><body>{body}</body></html>")
    }

    const DOM: &str = r#"
        <div data-testid="hero-rating-bar__aggregate-rating__score"><span>7.6</span><span>/10</span></div>
        <div data-testid="genres">
          <a href="/g/drama"><span class="ipc-chip__text">Drama</span></a>
          <a href="/g/war"><span class="ipc-chip__text">War</span></a>
        </div>
        <ul data-testid="hero-title-block__metadata"><li><a href="/x">2017</a></li></ul>"#;

    #[test]
    fn authoritative_payload_wins_over_dom() {
        let html = page(
            r#"<script type="application/ld+json">
               {"@type":"Movie","aggregateRating":{"ratingValue":8.1},"genre":["Thriller"]}</script>"#,
            DOM,
        );
        let enrichment = reader().read(&html);
        assert_eq!(enrichment.rating, Some(8.1));
        assert_eq!(enrichment.genres, ["Thriller"]);
        assert_eq!(enrichment.year, None);
    }

    #[test]
    fn dom_used_without_payload() {
        let enrichment = reader().read(&page("", DOM));
        assert_eq!(enrichment.rating, Some(7.6));
        assert_eq!(enrichment.genres, ["Drama", "War"]);
        assert_eq!(enrichment.year, Some(2017));
    }

    #[test]
    fn weak_payload_fills_dom_gaps() {
        let html = page(
            r#"<script type="application/ld+json">{"@type":"Movie","datePublished":"2003-05-01"}</script>"#,
            r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span>6.9</span></div>"#,
        );
        let enrichment = reader().read(&html);
        assert_eq!(enrichment.rating, Some(6.9));
        assert_eq!(enrichment.year, Some(2003));
        assert!(enrichment.genres.is_empty());
    }

    #[test]
    fn release_link_without_year_falls_back() {
        let html = page(
            r#"<script type="application/ld+json">{"dateCreated":"1988"}</script>"#,
            r#"<a href="/title/tt1/releaseinfo">Release info</a>"#,
        );
        assert_eq!(reader().read(&html).year, Some(1988));
    }

    #[tokio::test]
    async fn lookup_renders_title_url() {
        let renderer = Arc::new(StaticRenderer::serving(&page("", DOM)));
        let session = RenderSession::new(renderer.clone(), Duration::from_millis(20_000));
        let provider = RenderedPageProvider::new(session, BASE, YearWindow::ending(2026));

        let enrichment = provider.lookup("tt5013056").await.unwrap();
        assert_eq!(enrichment.rating, Some(7.6));
        assert_eq!(
            *renderer.visited.lock().unwrap(),
            ["https://title.example/title/tt5013056/"]
        );
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn render_failure_is_an_error() {
        let renderer = Arc::new(StaticRenderer {
            fail_navigation: true,
            ..StaticRenderer::serving("")
        });
        let session = RenderSession::new(renderer, Duration::from_secs(1));
        let provider = RenderedPageProvider::new(session, BASE, YearWindow::ending(2026));
        assert!(provider.lookup("tt1").await.is_err());
    }
}
