//! Typed rating API (OMDb wire format).
//!
//! `GET {endpoint}?i={id}&apikey={key}` answers with a flat JSON object whose
//! `Response` field is the string `"True"` or `"False"`. Missing values are the
//! literal `"N/A"`, and series report ranges such as `"2019–2021"` as `Year`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{Enrichment, RatingProvider};
use crate::http_client::PageClient;
use crate::resolve::text::{first_year, leading_number};

/// Value the API uses for "not available".
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "imdbRating")]
    rating: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbResponse {
    fn into_enrichment(self) -> Result<Enrichment> {
        if self.response != "True" {
            bail!(
                "OMDb error: {}",
                self.error.as_deref().unwrap_or("unspecified")
            );
        }

        Ok(Enrichment {
            rating: available(self.rating.as_deref()).and_then(leading_number),
            year: available(self.year.as_deref()).and_then(first_year),
            genres: Vec::new(),
        })
    }
}

fn available(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

/// Rating provider backed by the OMDb API.
pub struct OmdbProvider {
    client: PageClient,
    endpoint: String,
    api_key: String,
}

impl OmdbProvider {
    pub fn new(client: PageClient, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl RatingProvider for OmdbProvider {
    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn lookup(&self, external_id: &str) -> Result<Enrichment> {
        let response: OmdbResponse = self
            .client
            .fetch_json(&self.endpoint, &[("i", external_id), ("apikey", self.api_key.as_str())])
            .await?;
        response.into_enrichment()
    }
}
