//! Listing entries and the canonical movie record.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Title used when a detail page has no usable heading.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Display/serialized form of an unresolved release year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Display form of an empty genre list.
pub const UNKNOWN_GENRES: &str = "Unknown";

/// Base of the canonical external title page.
pub const EXTERNAL_TITLE_BASE: &str = "https://www.imdb.com/title/";

/// One movie link discovered on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub title: String,
    #[serde(rename = "url")]
    pub detail_url: String,
}

impl ListingEntry {
    pub fn new(title: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail_url: detail_url.into(),
        }
    }
}

/// Release year: a validated calendar year or the `"Unknown"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseYear {
    Known(i32),
    #[default]
    Unknown,
}

impl ReleaseYear {
    pub fn known(self) -> Option<i32> {
        match self {
            Self::Known(year) => Some(year),
            Self::Unknown => None,
        }
    }
}

impl From<Option<i32>> for ReleaseYear {
    fn from(year: Option<i32>) -> Self {
        year.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(year) => write!(f, "{year}"),
            Self::Unknown => f.write_str(UNKNOWN_YEAR),
        }
    }
}

impl Serialize for ReleaseYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(year) => serializer.serialize_i32(*year),
            Self::Unknown => serializer.serialize_str(UNKNOWN_YEAR),
        }
    }
}

impl<'de> Deserialize<'de> for ReleaseYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Year(i32),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Year(year) => Self::Known(year),
            Raw::Text(text) => text.trim().parse().map_or(Self::Unknown, Self::Known),
        })
    }
}

/// Canonical output unit of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub title: String,
    pub release_year: ReleaseYear,
    pub genres: Vec<String>,
    pub external_id: Option<String>,
    pub external_url: Option<String>,
    pub source_url: String,
    pub rating: Option<f64>,
}

impl MovieRecord {
    /// Start a record for `source_url`. Blank titles fall back to [`UNKNOWN_TITLE`].
    pub fn new(title: &str, source_url: impl Into<String>) -> Self {
        let title = title.trim();
        Self {
            title: if title.is_empty() {
                UNKNOWN_TITLE.to_string()
            } else {
                title.to_string()
            },
            release_year: ReleaseYear::Unknown,
            genres: Vec::new(),
            external_id: None,
            external_url: None,
            source_url: source_url.into(),
            rating: None,
        }
    }

    /// Attach the external identifier together with its derived URL.
    pub fn set_external_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.external_url = Some(external_url_for(&id));
        self.external_id = Some(id);
    }

    /// Genres joined for display, or `"Unknown"` when there are none.
    pub fn genres_display(&self) -> String {
        if self.genres.is_empty() {
            UNKNOWN_GENRES.to_string()
        } else {
            self.genres.join(", ")
        }
    }
}

/// Canonical title page for an external identifier.
pub fn external_url_for(id: &str) -> String {
    format!("{EXTERNAL_TITLE_BASE}{id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_becomes_sentinel() {
        let record = MovieRecord::new("   ", "https://cinema.example/event/1");
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.release_year, ReleaseYear::Unknown);
        assert!(record.external_id.is_none());
    }

    #[test]
    fn external_url_is_derived_from_id() {
        let mut record = MovieRecord::new("Heat", "https://cinema.example/event/2");
        record.set_external_id("tt0113277");
        assert_eq!(
            record.external_url.as_deref(),
            Some("https://www.imdb.com/title/tt0113277/")
        );
    }

    #[test]
    fn release_year_serializes_as_number_or_sentinel() {
        assert_eq!(serde_json::to_string(&ReleaseYear::Known(2019)).unwrap(), "2019");
        assert_eq!(
            serde_json::to_string(&ReleaseYear::Unknown).unwrap(),
            "\"Unknown\""
        );
        let back: ReleaseYear = serde_json::from_str("\"Unknown\"").unwrap();
        assert_eq!(back, ReleaseYear::Unknown);
        let back: ReleaseYear = serde_json::from_str("1999").unwrap();
        assert_eq!(back, ReleaseYear::Known(1999));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let mut record = MovieRecord::new("Heat", "https://cinema.example/event/2");
        record.set_external_id("tt0113277");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["releaseYear"], "Unknown");
        assert_eq!(json["externalId"], "tt0113277");
        assert_eq!(json["sourceUrl"], "https://cinema.example/event/2");
        assert!(json["rating"].is_null());
    }

    #[test]
    fn genres_join_only_for_display() {
        let mut record = MovieRecord::new("Heat", "u");
        assert_eq!(record.genres_display(), "Unknown");
        record.genres = vec!["Crime".into(), "Drama".into()];
        assert_eq!(record.genres_display(), "Crime, Drama");
    }

    #[test]
    fn listing_entry_serializes_url_key() {
        let entry = ListingEntry::new("Heat", "https://cinema.example/event/2");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["url"], "https://cinema.example/event/2");
    }
}
