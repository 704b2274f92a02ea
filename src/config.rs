//! Run configuration.
//!
//! Layers, lowest to highest: built-in defaults, the TOML file
//! (`~/.config/nowshowing/config.toml` or `--config`), environment variables,
//! then command-line flags (applied by the binary). Components receive the
//! finished [`Config`]; nothing else reads the environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoutError};
use crate::model::EXTERNAL_TITLE_BASE;

pub const DEFAULT_LISTING_URL: &str = "https://www.forumcinemas.lv/eng/movies/now-playing";
pub const DEFAULT_OMDB_ENDPOINT: &str = "http://www.omdbapi.com/";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 200;
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 20_000;

/// Which enrichment provider a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Typed rating API.
    #[default]
    Api,
    /// Headless-rendered title page.
    Rendered,
}

impl FromStr for ProviderKind {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "omdb" => Ok(Self::Api),
            "rendered" | "browser" => Ok(Self::Rendered),
            other => Err(ScoutError::Config(format!(
                "unknown provider '{other}' (expected 'api' or 'rendered')"
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Api => "api",
            Self::Rendered => "rendered",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub listing_url: String,
    pub provider: ProviderKind,
    pub omdb_api_key: Option<String>,
    pub omdb_endpoint: String,
    pub title_base_url: String,
    pub request_delay_ms: u64,
    pub render_timeout_ms: u64,
    pub chromium_path: Option<PathBuf>,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            provider: ProviderKind::default(),
            omdb_api_key: None,
            omdb_endpoint: DEFAULT_OMDB_ENDPOINT.to_string(),
            title_base_url: EXTERNAL_TITLE_BASE.to_string(),
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            render_timeout_ms: DEFAULT_RENDER_TIMEOUT_MS,
            chromium_path: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Config {
    /// `~/.config/nowshowing/config.toml`, when a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nowshowing").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then the config file, then the process environment.
    ///
    /// A missing default file is fine; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "loading config file");
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("NOWSHOWING_LISTING_URL") {
            self.listing_url = url;
        }
        if let Some(provider) = lookup("NOWSHOWING_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(key) = lookup("OMDB_API_KEY") {
            self.omdb_api_key = Some(key);
        }
        if let Some(delay) = lookup("NOWSHOWING_DELAY_MS") {
            self.request_delay_ms = delay.trim().parse().map_err(|_| {
                ScoutError::Config(format!("NOWSHOWING_DELAY_MS is not a number: {delay}"))
            })?;
        }
        if let Some(path) = lookup("NOWSHOWING_CHROMIUM_PATH") {
            self.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("NOWSHOWING_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Reject configurations that cannot start a run.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.listing_url).map_err(|e| {
            ScoutError::Config(format!("invalid listing_url {}: {e}", self.listing_url))
        })?;
        if self.provider == ProviderKind::Api && self.api_key().is_none() {
            return Err(ScoutError::MissingApiKey);
        }
        Ok(())
    }

    /// The API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.omdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}
