//! Headless page rendering.
//!
//! Title pages build most of their markup client-side, so the rendered-page
//! provider needs a real browser. [`Renderer`] and [`RenderContext`] abstract
//! over the engine (Chromium via chromiumoxide when the `render` feature is
//! on). [`RenderSession`] owns the open/close lifecycle: every context it
//! opens is closed again, on success, error and timeout alike.

#[cfg(feature = "render")]
pub mod chromium;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL and wait for the document to load.
    async fn navigate(&mut self, url: &str) -> Result<()>;
    /// Get the full page HTML.
    async fn get_html(&self) -> Result<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A renderer that always fails, used when no browser is available.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        Err(anyhow!("browser not available"))
    }
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
    fn active_contexts(&self) -> usize {
        0
    }
}

/// Renders whole pages with a bounded navigation time.
#[derive(Clone)]
pub struct RenderSession {
    renderer: Arc<dyn Renderer>,
    timeout: Duration,
}

impl RenderSession {
    pub fn new(renderer: Arc<dyn Renderer>, timeout: Duration) -> Self {
        Self { renderer, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a context, load `url`, return its HTML and close the context.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn page_html(&self, url: &str) -> Result<String> {
        let mut context = self.renderer.new_context().await?;

        let navigation = tokio::time::timeout(self.timeout, context.navigate(url)).await;
        let rendered = match navigation {
            Ok(Ok(())) => context.get_html().await,
            Ok(Err(e)) => Err(e.context(format!("navigation to {url} failed"))),
            Err(_) => Err(anyhow!(
                "navigation to {url} timed out after {}ms",
                self.timeout.as_millis()
            )),
        };

        if let Err(e) = context.close().await {
            warn!("failed to close render context: {e:#}");
        }

        if let Ok(html) = &rendered {
            debug!(bytes = html.len(), "page rendered");
        }
        rendered
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.renderer.shutdown().await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory renderer serving fixed HTML.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct StaticRenderer {
        pub html: String,
        pub fail_navigation: bool,
        pub hang: bool,
        pub visited: Arc<Mutex<Vec<String>>>,
        pub open: Arc<AtomicUsize>,
    }

    impl StaticRenderer {
        pub fn serving(html: &str) -> Self {
            Self {
                html: html.to_string(),
                fail_navigation: false,
                hang: false,
                visited: Arc::default(),
                open: Arc::default(),
            }
        }
    }

    struct StaticContext {
        html: String,
        fail_navigation: bool,
        hang: bool,
        visited: Arc<Mutex<Vec<String>>>,
        open: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for StaticRenderer {
        async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
            self.open.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StaticContext {
                html: self.html.clone(),
                fail_navigation: self.fail_navigation,
                hang: self.hang,
                visited: Arc::clone(&self.visited),
                open: Arc::clone(&self.open),
            }))
        }
        async fn shutdown(&self) -> Result<()> {
            Ok(())
        }
        fn active_contexts(&self) -> usize {
            self.open.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderContext for StaticContext {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            self.visited.lock().unwrap().push(url.to_string());
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_navigation {
                anyhow::bail!("net::ERR_NAME_NOT_RESOLVED");
            }
            Ok(())
        }
        async fn get_html(&self) -> Result<String> {
            Ok(self.html.clone())
        }
        async fn close(self: Box<Self>) -> Result<()> {
            self.open.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
