// Configuration loading.
// TOML file in the user config directory, environment overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::paths;
use crate::error::{GhlocError, Result};

pub const DEFAULT_SERVICE_URL: &str = "http://ghloc.bytes.pw";
pub const DEFAULT_STATS_URL: &str = "https://ghloc.vercel.app";

/// Runtime configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the LOC service; requests go to `<service_url>/<key>`.
    pub service_url: String,
    /// Base URL of the companion statistics page.
    pub stats_url: String,
    /// Freshness window for cached breakdowns, in seconds.
    pub cache_ttl_secs: u64,
    /// Request timeout, in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Overrides the per-user cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            stats_url: DEFAULT_STATS_URL.to_string(),
            cache_ttl_secs: 30 * 60,
            timeout_secs: 30,
            user_agent: concat!("ghloc/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        paths::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| GhlocError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GhlocError::Config(e.to_string()))
    }

    /// Apply `GHLOC_SERVICE_URL` and `GHLOC_CACHE_DIR`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("GHLOC_SERVICE_URL").filter(|v| !v.is_empty()) {
            self.service_url = url;
        }
        if let Some(dir) = var("GHLOC_CACHE_DIR").filter(|v| !v.is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(paths::cache_dir)
            .ok_or_else(|| GhlocError::Config("no cache directory available".to_string()))
    }
}
