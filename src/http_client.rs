//! Shared HTTP client.
//!
//! One pooled `reqwest` client serves the listing page, every detail page and
//! the rating API. It negotiates compression, keeps cookies between requests
//! and presents the desktop browser profile from [`crate::fingerprint`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::fingerprint::BrowserProfile;

/// Source of raw HTML documents.
///
/// The batch pipeline only needs this capability, which lets tests serve
/// fixture pages without a network.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` and return the body text. Non-success statuses are errors.
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// HTTP client used for every outbound request.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
    profile: BrowserProfile,
}

impl PageClient {
    /// Create a client with the desktop Chrome profile.
    pub fn new() -> Result<Self> {
        Self::with_profile(BrowserProfile::desktop_chrome())
    }

    /// Create client with specific browser profile
    pub fn with_profile(profile: BrowserProfile) -> Result<Self> {
        let headers = profile.to_headers();

        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTIONS
            // ═══════════════════════════════════════════════════════════════
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION (auto-negotiated via Accept-Encoding)
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            // ═══════════════════════════════════════════════════════════════
            // BROWSER PROFILE
            // ═══════════════════════════════════════════════════════════════
            .default_headers(headers)
            // ═══════════════════════════════════════════════════════════════
            // TIMEOUTS / REDIRECTS / COOKIES
            // ═══════════════════════════════════════════════════════════════
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, profile })
    }

    /// GET `url`, failing on non-success statuses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        debug!(
            status = %response.status(),
            version = ?response.version(),
            "response received"
        );

        response
            .error_for_status()
            .with_context(|| format!("unexpected status from {url}"))
    }

    /// Fetch and return body as string
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url).await?;
        response
            .text()
            .await
            .with_context(|| format!("failed to read body of {url}"))
    }

    /// GET `url` with query parameters and decode a JSON body.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn fetch_json<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("unexpected status from {url}"))?;

        debug!(status = %response.status(), "json response received");

        response
            .json::<T>()
            .await
            .with_context(|| format!("malformed JSON from {url}"))
    }

    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl DocumentFetcher for PageClient {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        self.fetch_text(url).await
    }
}
