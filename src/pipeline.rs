//! Batch pipeline.
//!
//! Drives every listing entry through
//! `Pending -> DetailFetched -> (Dropped | Enriched) -> Collected`.
//! Items are processed one at a time, in listing order. A failure while
//! fetching one item's detail page is logged with the item's identity and
//! the item is skipped; nothing that happens to one item stops the batch.
//!
//! Enrichment requests are spaced by a fixed delay. The delay sits between
//! successive enrichments only, so a batch with one enrichable item never
//! sleeps.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::detail::DetailExtractor;
use crate::enrich::EnrichmentCoordinator;
use crate::http_client::DocumentFetcher;
use crate::model::{ListingEntry, MovieRecord};

/// Lifecycle of one listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    DetailFetched,
    Dropped,
    Enriched,
    Collected,
}

impl ItemState {
    /// Whether `self -> next` is a legal step.
    pub fn can_advance_to(self, next: ItemState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::DetailFetched)
                | (Self::DetailFetched, Self::Dropped | Self::Enriched)
                | (Self::Enriched, Self::Collected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dropped | Self::Collected)
    }
}

/// An entry together with its current state.
#[derive(Debug)]
struct Item<'a> {
    entry: &'a ListingEntry,
    state: ItemState,
}

impl<'a> Item<'a> {
    fn new(entry: &'a ListingEntry) -> Self {
        Self {
            entry,
            state: ItemState::Pending,
        }
    }

    fn advance(&mut self, next: ItemState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal item transition {:?} -> {next:?}",
            self.state
        );
        debug!(url = %self.entry.detail_url, from = ?self.state, to = ?next, "item state");
        self.state = next;
    }
}

/// How one item ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Collected(MovieRecord),
    Dropped(ListingEntry),
    Failed { entry: ListingEntry, error: String },
}

/// An item skipped because its detail page could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedItem {
    pub entry: ListingEntry,
    pub error: String,
}

/// Result of a batch, each list in listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub records: Vec<MovieRecord>,
    pub dropped: Vec<ListingEntry>,
    pub failed: Vec<FailedItem>,
}

impl BatchReport {
    fn push(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Collected(record) => self.records.push(record),
            ItemOutcome::Dropped(entry) => self.dropped.push(entry),
            ItemOutcome::Failed { entry, error } => self.failed.push(FailedItem { entry, error }),
        }
    }

    /// Collected records that ended up with a rating.
    pub fn rated(&self) -> usize {
        self.records.iter().filter(|r| r.rating.is_some()).count()
    }

    pub fn processed(&self) -> usize {
        self.records.len() + self.dropped.len() + self.failed.len()
    }
}

/// Observer for per-item progress, used by the CLI.
pub trait Progress: Send + Sync {
    fn item_started(&self, _position: usize, _total: usize, _entry: &ListingEntry) {}
    fn item_finished(&self, _outcome: &ItemOutcome) {}
}

/// Progress observer that ignores everything.
pub struct Silent;

impl Progress for Silent {}

/// Sequential detail-fetch, extract and enrich over a listing.
pub struct BatchPipeline {
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: DetailExtractor,
    coordinator: EnrichmentCoordinator,
    delay: Duration,
}

impl BatchPipeline {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: DetailExtractor,
        coordinator: EnrichmentCoordinator,
        delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            coordinator,
            delay,
        }
    }

    /// Process every entry. Never fails; see [`BatchReport`] for what happened.
    pub async fn run(&self, entries: &[ListingEntry], progress: &dyn Progress) -> BatchReport {
        let total = entries.len();
        let mut report = BatchReport::default();
        let mut enrichments = 0usize;

        info!(
            total,
            provider = self.coordinator.provider_name(),
            "batch started"
        );

        for (index, entry) in entries.iter().enumerate() {
            progress.item_started(index + 1, total, entry);

            let span = info_span!("item", title = %entry.title, url = %entry.detail_url);
            let outcome = self
                .process(entry, &mut enrichments)
                .instrument(span)
                .await;

            progress.item_finished(&outcome);
            report.push(outcome);
        }

        info!(
            collected = report.records.len(),
            dropped = report.dropped.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        report
    }

    async fn process(&self, entry: &ListingEntry, enrichments: &mut usize) -> ItemOutcome {
        let mut item = Item::new(entry);

        let html = match self.fetcher.fetch_document(&entry.detail_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("detail page failed: {e:#}");
                return ItemOutcome::Failed {
                    entry: entry.clone(),
                    error: format!("{e:#}"),
                };
            }
        };
        item.advance(ItemState::DetailFetched);

        let mut record = self.extractor.extract(&html, &entry.detail_url);
        if record.external_id.is_none() {
            info!("no external identifier, dropping");
            item.advance(ItemState::Dropped);
            return ItemOutcome::Dropped(entry.clone());
        }

        if *enrichments > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        *enrichments += 1;
        self.coordinator.enrich(&mut record).await;
        item.advance(ItemState::Enriched);

        item.advance(ItemState::Collected);
        debug_assert!(item.state.is_terminal());
        ItemOutcome::Collected(record)
    }
}
