//! Rating enrichment.
//!
//! A record that carries an external identifier is sent to exactly one
//! [`RatingProvider`]: the typed API ([`omdb::OmdbProvider`]) or the rendered
//! title page ([`rendered::RenderedPageProvider`]). Whatever the provider
//! returns is validated and merged back into the record.
//!
//! Merge rule: the rating always comes from the provider, even when it has
//! none. Year and genres replace the record's values only when the provider
//! actually supplies them.
//!
//! Provider failures never reach the caller. The coordinator logs them and
//! merges an empty [`Enrichment`] instead.

pub mod omdb;
pub mod rendered;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{MovieRecord, ReleaseYear};
use crate::resolve::{Field, GenreField, RatingField, YearField, YearWindow};

/// Values a provider reports for one title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrichment {
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub genres: Vec<String>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.year.is_none() && self.genres.is_empty()
    }

    /// Drop values outside the field domains.
    #[must_use]
    pub fn validated(self, window: YearWindow) -> Self {
        Self {
            rating: self.rating.and_then(|r| RatingField.validate(r)),
            year: self.year.and_then(|y| YearField::new(window).validate(y)),
            genres: GenreField.validate(self.genres).unwrap_or_default(),
        }
    }

    /// Apply this enrichment to `record`. Repeating the merge changes nothing.
    pub fn merge_into(&self, record: &mut MovieRecord) {
        record.rating = self.rating;
        if let Some(year) = self.year {
            record.release_year = ReleaseYear::Known(year);
        }
        if !self.genres.is_empty() {
            record.genres.clone_from(&self.genres);
        }
    }
}

/// Source of rating (and optionally year/genre) data for an external id.
#[async_trait]
pub trait RatingProvider: Send + Sync {
    /// Provider name (e.g., "omdb", "rendered").
    fn name(&self) -> &'static str;

    /// Look up one title. A title the provider does not know is an error.
    async fn lookup(&self, external_id: &str) -> Result<Enrichment>;
}

/// Runs the configured provider and merges its results.
pub struct EnrichmentCoordinator {
    provider: Box<dyn RatingProvider>,
    window: YearWindow,
}

impl EnrichmentCoordinator {
    pub fn new(provider: Box<dyn RatingProvider>, window: YearWindow) -> Self {
        Self { provider, window }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Validated provider data for `external_id`; empty on any failure.
    pub async fn fetch(&self, external_id: &str) -> Enrichment {
        match self.provider.lookup(external_id).await {
            Ok(enrichment) => {
                let enrichment = enrichment.validated(self.window);
                debug!(
                    provider = self.provider.name(),
                    external_id,
                    rating = ?enrichment.rating,
                    year = ?enrichment.year,
                    "enrichment received"
                );
                enrichment
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    external_id,
                    "enrichment failed: {e:#}"
                );
                Enrichment::default()
            }
        }
    }

    /// Enrich `record` in place. Records without an external id are left alone.
    pub async fn enrich(&self, record: &mut MovieRecord) {
        let Some(external_id) = record.external_id.clone() else {
            return;
        };
        self.fetch(&external_id).await.merge_into(record);
    }
}
