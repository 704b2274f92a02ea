//! Detail-page extraction.
//!
//! [`DetailExtractor`] turns one cinema detail page into a [`MovieRecord`].
//! It never fails: every field degrades to its sentinel when nothing usable
//! is found. Year, genres and rating go through [`FieldChain`]s; the title has
//! no fallback and the external identifier is taken from the first matching
//! link.
//!
//! A structured-data payload on the page is used only when it is
//! authoritative (rating or genres present). Its fields sit at the head of
//! each chain, so markup strategies run only for fields the payload left
//! empty.

pub mod strategies;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::model::MovieRecord;
use crate::resolve::text::element_text;
use crate::resolve::{FieldChain, GenreField, RatingField, YearField, YearWindow};
use crate::structured::{self, DecodedMetadata};

use strategies::{
    CommaBlock, DescriptionRegions, GenericScan, GenreVocabulary, PayloadGenres, PayloadRating,
    PayloadYear, ReleaseDateLabel, TitleParenthesis,
};

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.list-item-desc-title").expect("static selector"));
static EXTERNAL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="imdb.com/title/"]"#).expect("static selector"));
static EXTERNAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"imdb\.com/title/(tt\d+)").expect("static id pattern"));

/// A parsed detail page plus the values every strategy shares.
pub struct DetailPage {
    document: Html,
    title: String,
    payload: Option<DecodedMetadata>,
}

impl DetailPage {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let title = document
            .select(&TITLE)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let payload = structured::find_in_document(&document);

        Self {
            document,
            title,
            payload,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Heading text, empty when the page has none.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn payload(&self) -> Option<&DecodedMetadata> {
        self.payload.as_ref()
    }

    /// The payload, if it is trusted enough to outrank markup.
    pub fn authoritative_payload(&self) -> Option<&DecodedMetadata> {
        self.payload.as_ref().filter(|p| p.is_authoritative())
    }

    /// First canonical external identifier linked from the page.
    pub fn external_id(&self) -> Option<String> {
        self.document
            .select(&EXTERNAL_LINK)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| EXTERNAL_ID.captures(href).map(|caps| caps[1].to_string()))
    }
}

/// Strategies that ran for each field, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionTrace {
    pub year: Vec<&'static str>,
    pub genres: Vec<&'static str>,
    pub rating: Vec<&'static str>,
}

/// A record together with how it was resolved.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: MovieRecord,
    pub trace: ExtractionTrace,
}

/// Builds [`MovieRecord`]s from detail pages.
pub struct DetailExtractor {
    year_field: YearField,
    year: FieldChain<DetailPage, i32>,
    genres: FieldChain<DetailPage, Vec<String>>,
    rating: FieldChain<DetailPage, f64>,
}

impl DetailExtractor {
    pub fn new(window: YearWindow) -> Self {
        let year = FieldChain::new()
            .then(PayloadYear)
            .then(ReleaseDateLabel)
            .then(TitleParenthesis)
            .then(DescriptionRegions::new(window))
            .then(GenericScan::new(window));

        let genres = FieldChain::new()
            .then(PayloadGenres)
            .then(CommaBlock)
            .then(GenreVocabulary);

        let rating = FieldChain::new().then(PayloadRating);

        Self {
            year_field: YearField::new(window),
            year,
            genres,
            rating,
        }
    }

    pub fn year_chain(&self) -> &FieldChain<DetailPage, i32> {
        &self.year
    }

    pub fn genre_chain(&self) -> &FieldChain<DetailPage, Vec<String>> {
        &self.genres
    }

    /// Build a record from a detail page's markup.
    pub fn extract(&self, html: &str, source_url: &str) -> MovieRecord {
        self.extract_traced(html, source_url).record
    }

    /// Like [`extract`](Self::extract), also reporting which strategies ran.
    pub fn extract_traced(&self, html: &str, source_url: &str) -> Extraction {
        let page = DetailPage::parse(html);
        self.extract_page(&page, source_url)
    }

    pub fn extract_page(&self, page: &DetailPage, source_url: &str) -> Extraction {
        let mut record = MovieRecord::new(page.title(), source_url);

        let year = self.year.resolve(&self.year_field, page);
        match (year.value(), year.winner()) {
            (Some(value), Some(strategy)) => {
                debug!(year = value, strategy, "release year resolved");
            }
            _ => debug!(url = source_url, "no release year found"),
        }

        let genres = self.genres.resolve(&GenreField, page);
        let rating = self.rating.resolve(&RatingField, page);

        let trace = ExtractionTrace {
            year: year.attempted().to_vec(),
            genres: genres.attempted().to_vec(),
            rating: rating.attempted().to_vec(),
        };

        record.release_year = year.into_value().into();
        record.genres = genres.into_value().unwrap_or_default();
        record.rating = rating.into_value();
        if let Some(id) = page.external_id() {
            record.set_external_id(id);
        }

        Extraction { record, trace }
    }
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new(YearWindow::current())
    }
}
