//! Chromium-based renderer using chromiumoxide.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{RenderContext, Renderer};
use crate::fingerprint::DESKTOP_CHROME_UA;

/// Find the Chromium binary path.
///
/// Checks the configured path first, then a browser unpacked under the user
/// cache directory, then `PATH`.
pub fn find_chromium(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        debug!(path = %path.display(), "configured chromium path does not exist");
    }

    if let Some(cache) = dirs::cache_dir() {
        let base = cache.join("nowshowing/chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                base.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                base.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
            ]
        } else {
            vec![base.join("chrome-linux64/chrome"), base.join("chrome")]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    ["google-chrome", "chromium", "chromium-browser"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
}

/// Headless Chromium presenting the desktop browser profile.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a headless Chromium instance.
    pub async fn launch(configured: Option<&Path>) -> Result<Self> {
        let chrome_path = find_chromium(configured)
            .context("Chromium not found; set chromium_path or NOWSHOWING_CHROMIUM_PATH")?;
        info!(path = %chrome_path.display(), "launching headless chromium");

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg(format!("--user-agent={DESKTOP_CHROME_UA}"))
            .build()
            .map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page: Some(page),
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("failed to close Chromium")?;
        browser.wait().await.context("failed to reap Chromium")?;
        self.handler.abort();
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Option<Page>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumContext {
    fn page(&self) -> Result<&Page> {
        self.page.as_ref().context("render context already closed")
    }
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self.page()?;
        page.goto(url)
            .await
            .with_context(|| format!("failed to load {url}"))?;
        Ok(())
    }

    async fn get_html(&self) -> Result<String> {
        self.page()?.content().await.context("failed to get HTML")
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        if let Some(page) = self.page.take() {
            page.close().await.context("failed to close page")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSession;
    use std::time::Duration;

    #[test]
    fn configured_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("chrome");
        std::fs::write(&fake, b"").unwrap();
        assert_eq!(find_chromium(Some(&fake)), Some(fake.clone()));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn renders_data_url() {
        let renderer = Arc::new(ChromiumRenderer::launch(None).await.unwrap());
        let session = RenderSession::new(renderer.clone(), Duration::from_secs(20));

        let html = session
            .page_html("data:text/html,<h1>Hello</h1><p>World</p>")
            .await
            .unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert_eq!(renderer.active_contexts(), 0);

        session.shutdown().await.unwrap();
    }
}
