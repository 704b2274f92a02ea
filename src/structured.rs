//! Embedded structured-data (JSON-LD) decoding.
//!
//! Pages describe the media item in a `<script type="application/ld+json">`
//! block. The payload is loosely typed: it may be one object or a list of
//! candidate objects, ratings may be numbers or strings, and `genre` may be a
//! list or a comma-delimited string. [`decode`] folds all of that into
//! [`DecodedMetadata`]; nothing past this module sees the raw shape.
//!
//! Malformed payloads are common and decode to `None` instead of an error.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolve::fields::RatingField;
use crate::resolve::text::{first_year, leading_number};
use crate::resolve::Field;

/// `@type` values that describe a title page's main item.
pub const MEDIA_KINDS: &[&str] = &["Movie", "TVSeries", "VideoObject"];

/// Date-like fields searched for a year, in priority order.
const DATE_FIELDS: &[&str] = &["datePublished", "dateCreated", "releaseDate"];

static LD_JSON: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

/// Canonical fields recovered from a structured-data payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecodedMetadata {
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub genres: Vec<String>,
}

impl DecodedMetadata {
    /// A payload is trusted only when it carries a rating or any genre.
    pub fn is_authoritative(&self) -> bool {
        self.rating.is_some() || !self.genres.is_empty()
    }
}

/// Raw payload shape, resolved once at decode time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Sequence(Vec<Value>),
    Single(Map<String, Value>),
}

impl Payload {
    /// The object describing the media item.
    fn into_item(self) -> Option<Map<String, Value>> {
        match self {
            Payload::Single(item) => Some(item),
            Payload::Sequence(items) => {
                let index = items
                    .iter()
                    .position(declares_media_kind)
                    .unwrap_or(0);
                items.into_iter().nth(index).and_then(|v| match v {
                    Value::Object(item) => Some(item),
                    _ => None,
                })
            }
        }
    }
}

/// Decode a payload's text. `None` when it is not JSON or has no object.
pub fn decode(payload: &str) -> Option<DecodedMetadata> {
    let payload: Payload = serde_json::from_str(payload.trim()).ok()?;
    let item = payload.into_item()?;

    Some(DecodedMetadata {
        rating: decode_rating(&item),
        year: decode_year(&item),
        genres: decode_genres(&item),
    })
}

/// First decodable structured-data block in a parsed document.
pub fn find_in_document(document: &Html) -> Option<DecodedMetadata> {
    document
        .select(&LD_JSON)
        .find_map(|script| decode(&script.text().collect::<String>()))
}

fn declares_media_kind(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => MEDIA_KINDS.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| MEDIA_KINDS.contains(&kind)),
        _ => false,
    }
}

fn decode_rating(item: &Map<String, Value>) -> Option<f64> {
    let raw = item.get("aggregateRating")?.get("ratingValue")?;
    let rating = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }?;
    RatingField.validate(rating)
}

fn decode_year(item: &Map<String, Value>) -> Option<i32> {
    DATE_FIELDS.iter().find_map(|field| match item.get(*field)? {
        Value::String(date) => first_year(date),
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        _ => None,
    })
}

fn decode_genres(item: &Map<String, Value>) -> Vec<String> {
    let raw: Vec<&str> = match item.get("genre") {
        Some(Value::Array(list)) => list.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(list)) => list.split(',').collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(ToString::to_string)
        .collect()
}
