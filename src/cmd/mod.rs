//! Subcommand implementations.

mod detail;
mod lookup;
mod output;
mod run;

pub use detail::cmd_detail;
pub use lookup::cmd_lookup;
pub use run::cmd_run;

use std::sync::Arc;

use anyhow::Result;

use nowshowing::{
    Config, OmdbProvider, PageClient, ProviderKind, RatingProvider, RenderSession,
    RenderedPageProvider, Renderer, ScoutError, YearWindow,
};

/// The configured rating provider, plus the render session backing it, if any.
pub(crate) struct ProviderSetup {
    pub provider: Box<dyn RatingProvider>,
    pub session: Option<RenderSession>,
}

/// Close the browser behind a rendered provider.
pub(crate) async fn close_session(session: Option<&RenderSession>) {
    if let Some(session) = session {
        if let Err(e) = session.shutdown().await {
            tracing::warn!("browser shutdown failed: {e:#}");
        }
    }
}

pub(crate) async fn build_provider(
    config: &Config,
    client: &PageClient,
    window: YearWindow,
) -> Result<ProviderSetup> {
    match config.provider {
        ProviderKind::Api => {
            let key = config.api_key().ok_or(ScoutError::MissingApiKey)?;
            let provider = OmdbProvider::new(client.clone(), &config.omdb_endpoint, key);
            Ok(ProviderSetup {
                provider: Box::new(provider),
                session: None,
            })
        }
        ProviderKind::Rendered => {
            let session = RenderSession::new(launch_renderer(config).await?, config.render_timeout());
            let provider =
                RenderedPageProvider::new(session.clone(), &config.title_base_url, window);
            Ok(ProviderSetup {
                provider: Box::new(provider),
                session: Some(session),
            })
        }
    }
}

#[cfg(feature = "render")]
async fn launch_renderer(config: &Config) -> Result<Arc<dyn Renderer>> {
    let renderer = nowshowing::render::chromium::ChromiumRenderer::launch(
        config.chromium_path.as_deref(),
    )
    .await
    .map_err(|e| ScoutError::Render(format!("{e:#}")))?;
    Ok(Arc::new(renderer))
}

#[cfg(not(feature = "render"))]
async fn launch_renderer(_config: &Config) -> Result<Arc<dyn Renderer>> {
    Err(ScoutError::Render("built without the `render` feature".to_string()).into())
}
