//! Search configuration with defaults, an optional TOML file and environment overrides.
//!
//! Resolution order, later wins:
//! 1. [`SearchConfig::default()`]
//! 2. TOML file at `$SITE_SEARCH_CONFIG`, else `<config dir>/site-search/config.toml` if present
//! 3. `SITE_SEARCH_URL` and `SITE_SEARCH_INDEX_FILE`

use crate::catalog::SEARCH_INDEX_PATH;
use crate::error::Result;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SITE_SEARCH_CONFIG";
/// Environment override for [`SearchConfig::site_url`].
pub const SITE_URL_ENV: &str = "SITE_SEARCH_URL";
/// Environment override for [`SearchConfig::index_file`].
pub const INDEX_FILE_ENV: &str = "SITE_SEARCH_INDEX_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Site origin; the index is requested from `{site_url}/search-index.json`.
    pub site_url: String,
    /// Read the index from this file instead of over HTTP.
    pub index_file: Option<PathBuf>,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Prefer a previously retrieved copy of the index over the network.
    pub prefer_cached: bool,
    /// Where retrieved copies are kept. Defaults to the user cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Retrieved copies older than this are refetched. 0 disables the disk copy.
    pub cache_ttl_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            site_url: "https://exquisitedentistry.com".to_string(),
            index_file: None,
            timeout_seconds: 10,
            prefer_cached: true,
            cache_dir: None,
            cache_ttl_seconds: 24 * 60 * 60,
        }
    }
}

impl SearchConfig {
    /// Load configuration from the default file location and the process environment.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_file().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/site-search/config.toml`, if the platform has a config directory.
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("site-search").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply environment overrides through `lookup` so tests need not touch the process env.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SITE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.site_url = url.trim().to_string();
        }
        if let Some(file) = lookup(INDEX_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            self.index_file = Some(PathBuf::from(file.trim()));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than 0");
        }
        let lower = self.site_url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            bail!("site_url must be an http(s) URL, got '{}'", self.site_url);
        }
        Ok(())
    }

    /// Full URL of the search index document.
    pub fn index_url(&self) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), SEARCH_INDEX_PATH)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Directory for retrieved copies, or `None` when disk caching is off.
    pub fn cache_directory(&self) -> Option<PathBuf> {
        if !self.prefer_cached || self.cache_ttl_seconds == 0 {
            return None;
        }
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("site-search")))
    }
}
