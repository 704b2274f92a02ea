//! Now-playing listing discovery.
//!
//! The listing page links every movie (several times over: poster, title,
//! "Buy tickets", trailer). Only event-page links with a usable text label are
//! kept, made absolute and deduplicated by URL in first-seen order.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{Result, ScoutError};
use crate::http_client::DocumentFetcher;
use crate::model::ListingEntry;
use crate::resolve::text::element_text;

static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/title/"]"#).expect("static selector"));

/// Link labels at least this long are page chrome, not titles.
const MAX_LABEL_CHARS: usize = 1000;

/// Labels that mark non-title links to the same event.
const EXCLUDED_LABELS: &[&str] = &["Buy tickets", "Trailer"];

/// Parse listing markup fetched from `base`.
pub fn parse_listing(html: &str, base: &Url) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for link in document.select(&TITLE_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/eng/event/") {
            continue;
        }

        let title = element_text(link);
        if title.is_empty()
            || title.chars().count() >= MAX_LABEL_CHARS
            || EXCLUDED_LABELS.iter().any(|label| title.contains(label))
        {
            continue;
        }

        let Ok(url) = base.join(href) else {
            debug!(href, "skipping unresolvable listing link");
            continue;
        };
        let url = url.to_string();
        if seen.insert(url.clone()) {
            entries.push(ListingEntry::new(title, url));
        }
    }

    entries
}

/// Fetch and parse the listing page. An empty listing is fatal.
#[instrument(skip(fetcher))]
pub async fn discover(fetcher: &dyn DocumentFetcher, listing_url: &str) -> Result<Vec<ListingEntry>> {
    let base = Url::parse(listing_url)
        .map_err(|e| ScoutError::Config(format!("invalid listing URL {listing_url}: {e}")))?;

    let html = fetcher
        .fetch_document(listing_url)
        .await
        .map_err(|e| ScoutError::Listing {
            url: listing_url.to_string(),
            reason: format!("{e:#}"),
        })?;

    let entries = parse_listing(&html, &base);
    if entries.is_empty() {
        return Err(ScoutError::EmptyListing(listing_url.to_string()));
    }

    info!(count = entries.len(), "listing discovered");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const LISTING: &str = "https://www.forumcinemas.lv/eng/movies/now-playing";

    fn base() -> Url {
        Url::parse(LISTING).unwrap()
    }

    struct Page(&'static str);

    #[async_trait]
    impl DocumentFetcher for Page {
        async fn fetch_document(&self, _url: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Down;

    #[async_trait]
    impl DocumentFetcher for Down {
        async fn fetch_document(&self, url: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused: {url}")
        }
    }

    #[test]
    fn keeps_event_title_links_only() {
        let html = r#"
            <a href="/eng/event/3001/title/heat/">Heat</a>
            <a href="/eng/event/3001/title/heat/">Buy tickets</a>
            <a href="/eng/event/3001/title/heat/trailer">Trailer</a>
            <a href="/lv/event/3002/title/other/">Cits</a>
            <a href="/eng/event/3003/">No title path</a>
            <a href="/eng/event/3004/title/blank/">   </a>
            <a>no href</a>"#;
        let entries = parse_listing(html, &base());
        assert_eq!(
            entries,
            [ListingEntry::new(
                "Heat",
                "https://www.forumcinemas.lv/eng/event/3001/title/heat/"
            )]
        );
    }

    #[test]
    fn deduplicates_by_url_keeping_first() {
        let html = r#"
            <a href="/eng/event/1/title/a/">First label</a>
            <a href="/eng/event/2/title/b/">Second</a>
            <a href="https://www.forumcinemas.lv/eng/event/1/title/a/">Again</a>"#;
        let entries = parse_listing(html, &base());
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["First label", "Second"]);
    }

    #[test]
    fn absolute_links_are_kept_as_is() {
        let html = r#"<a href="https://cdn.example/eng/event/9/title/x/">X</a>"#;
        let entries = parse_listing(html, &base());
        assert_eq!(entries[0].detail_url, "https://cdn.example/eng/event/9/title/x/");
    }

    #[test]
    fn overlong_labels_are_skipped() {
        let label = "x".repeat(MAX_LABEL_CHARS);
        let html = format!(r#"<a href="/eng/event/1/title/a/">{label}</a>"#);
        assert!(parse_listing(&html, &base()).is_empty());
    }

    #[tokio::test]
    async fn empty_listing_is_fatal() {
        let err = discover(&Page("<html><body>closed</body></html>"), LISTING)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::EmptyListing(url) if url == LISTING));
    }

    #[tokio::test]
    async fn unreachable_listing_is_fatal() {
        let err = discover(&Down, LISTING).await.unwrap_err();
        assert!(matches!(err, ScoutError::Listing { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn discover_returns_entries() {
        let entries = discover(&Page(r#"<a href="/eng/event/1/title/a/">A</a>"#), LISTING)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }
}
