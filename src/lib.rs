//! `nowshowing` - now-playing cinema listings, enriched
//!
//! # Features
//!
//! - **Listing discovery**: movie links from a cinema's now-playing page
//! - **Detail extraction**: title, release year, genres and external id, each
//!   field resolved through an ordered chain of fallback strategies
//! - **Structured data**: embedded JSON-LD decoded into canonical fields
//! - **Enrichment**: ratings from a typed API or a headless-rendered title page
//! - **Batch pipeline**: per-item isolation and a fixed delay between
//!   enrichment requests
//!
//! # Example
//!
//! ```rust,no_run
//! use nowshowing::{DetailExtractor, PageClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PageClient::new()?;
//!     let url = "https://www.forumcinemas.lv/eng/event/1234/title/example/";
//!     let html = client.fetch_text(url).await?;
//!     let record = DetailExtractor::default().extract(&html, url);
//!     println!("{} ({})", record.title, record.release_year);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod detail;
pub mod enrich;
pub mod error;
pub mod fingerprint;
pub mod http_client;
pub mod listing;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod structured;

pub use config::{Config, ProviderKind};
pub use detail::{DetailExtractor, Extraction, ExtractionTrace};
pub use enrich::omdb::OmdbProvider;
pub use enrich::rendered::RenderedPageProvider;
pub use enrich::{Enrichment, EnrichmentCoordinator, RatingProvider};
pub use error::{Result, ScoutError};
pub use fingerprint::BrowserProfile;
pub use http_client::{DocumentFetcher, PageClient};
pub use model::{ListingEntry, MovieRecord, ReleaseYear};
pub use persist::DataDir;
pub use pipeline::{BatchPipeline, BatchReport, ItemOutcome, ItemState, Progress};
pub use render::{RenderSession, Renderer};
pub use resolve::YearWindow;

/// Version of nowshowing
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
