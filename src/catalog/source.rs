//! Where the content index comes from, and how it is fetched.

use super::Catalog;
use crate::cache::IndexCache;
use crate::config::SearchConfig;
use crate::error::{LoadError, Result};
use anyhow::Context;
use std::path::PathBuf;
use std::time::Instant;

/// Well-known path of the index document under the site origin.
pub const SEARCH_INDEX_PATH: &str = "/search-index.json";

/// Location of the index document.
#[derive(Debug, Clone)]
pub enum IndexSource {
    /// Fetched over HTTP(S), optionally through an on-disk copy.
    Http {
        url: String,
        client: reqwest::Client,
        cache: Option<IndexCache>,
    },
    /// Read from a local file, e.g. a build's `public/search-index.json`.
    File { path: PathBuf },
}

impl IndexSource {
    /// Build the source described by a configuration.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        if let Some(path) = &config.index_file {
            return Ok(Self::File { path: path.clone() });
        }

        let cache = config.cache_directory().map(|dir| {
            IndexCache::new(
                dir,
                std::time::Duration::from_secs(config.cache_ttl_seconds),
            )
        });

        Ok(Self::Http {
            url: config.index_url(),
            client: build_client(config)?,
            cache,
        })
    }

    /// An HTTP source without a disk copy.
    pub fn http(url: impl Into<String>) -> Result<Self> {
        let client = build_client(&SearchConfig::default())?;
        Ok(Self::Http {
            url: url.into(),
            client,
            cache: None,
        })
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Human-readable location for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Http { url, .. } => url.clone(),
            Self::File { path } => path.display().to_string(),
        }
    }

    /// Fetch and parse the index.
    pub async fn fetch(&self) -> std::result::Result<Catalog, LoadError> {
        let start = Instant::now();
        let catalog = match self {
            Self::Http { url, client, cache } => fetch_http(url, client, cache.as_ref()).await?,
            Self::File { path } => {
                let bytes = tokio::fs::read(path).await.map_err(|e| LoadError::Io {
                    path: path.display().to_string(),
                    error: e.to_string(),
                })?;
                Catalog::from_slice(&bytes)?
            }
        };

        tracing::info!(
            "Loaded search index from {}: {} entries (version {}) in {:?}",
            self.describe(),
            catalog.len(),
            catalog.version(),
            start.elapsed()
        );
        Ok(catalog)
    }
}

async fn fetch_http(
    url: &str,
    client: &reqwest::Client,
    cache: Option<&IndexCache>,
) -> std::result::Result<Catalog, LoadError> {
    if let Some(cache) = cache
        && let Some(bytes) = cache.load(url).await
    {
        match Catalog::from_slice(&bytes) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => {
                tracing::warn!("Discarding unreadable cached search index: {}", e);
                cache.remove(url).await;
            }
        }
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::request(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await.map_err(|e| LoadError::request(&e))?;
    let catalog = Catalog::from_slice(&bytes)?;

    if let Some(cache) = cache
        && let Err(e) = cache.store(url, &bytes).await
    {
        tracing::warn!("Failed to cache search index: {:#}", e);
    }

    Ok(catalog)
}

/// Build the HTTP client used for index requests.
pub(crate) fn build_client(config: &SearchConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_file_config_wins_over_url() {
        let config = SearchConfig {
            index_file: Some(PathBuf::from("public/search-index.json")),
            ..Default::default()
        };
        let_assert!(Ok(IndexSource::File { path }) = IndexSource::from_config(&config));
        check!(path == PathBuf::from("public/search-index.json"));
    }

    #[test]
    fn test_http_config() {
        let config = SearchConfig {
            site_url: "http://localhost:4173".into(),
            prefer_cached: false,
            ..Default::default()
        };
        let_assert!(Ok(source) = IndexSource::from_config(&config));
        check!(source.describe() == "http://localhost:4173/search-index.json");
        let_assert!(IndexSource::Http { cache, .. } = source);
        check!(cache.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = IndexSource::file("/nonexistent/search-index.json");
        let_assert!(Err(LoadError::Io { path, .. }) = source.fetch().await);
        check!(path == "/nonexistent/search-index.json");
    }
}
