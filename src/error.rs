//! Crate-level error type.
//!
//! Only conditions that stop a run from starting surface as [`ScoutError`].
//! Per-item faults travel as `anyhow::Error` and are absorbed by the batch
//! pipeline.

use thiserror::Error;

/// Errors that abort a run or a top-level command.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("the api provider needs an API key (set OMDB_API_KEY or omdb_api_key in the config file)")]
    MissingApiKey,

    #[error("failed to fetch listing {url}: {reason}")]
    Listing { url: String, reason: String },

    #[error("no listing entries found at {0}")]
    EmptyListing(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
