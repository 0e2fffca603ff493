//! On-disk copy of the last retrieved search index.
//!
//! Fetches prefer a previously retrieved copy when one exists and is younger than the
//! configured age, mirroring a browser's `force-cache` request mode. Copies are keyed by
//! a hash of the index URL so several sites can share one cache directory.

use crate::error::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use xxhash_rust::xxh3::xxh3_64;

/// Directory-backed store of raw index documents.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
    max_age: Duration,
}

impl IndexCache {
    pub const fn new(dir: PathBuf, max_age: Duration) -> Self {
        Self { dir, max_age }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the copy for `url`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("search-index-{:016x}.json", xxh3_64(url.as_bytes())))
    }

    /// Read a stored copy if it exists and is fresh enough.
    pub async fn load(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.path_for(url);
        let modified = tokio::fs::metadata(&path).await.ok()?.modified().ok()?;

        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > self.max_age {
            tracing::debug!(
                "Cached search index at {} is stale ({:?} old)",
                path.display(),
                age
            );
            return None;
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("Using cached search index at {}", path.display());
                Some(bytes)
            }
            Err(e) => {
                tracing::warn!("Failed to read cached search index {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store a freshly fetched copy, replacing any previous one.
    pub async fn store(&self, url: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        // Write-then-rename so a concurrent reader never sees a partial document.
        let path = self.path_for(url);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move index copy into {}", path.display()))?;

        tracing::debug!("Cached search index to {}", path.display());
        Ok(())
    }

    /// Drop the stored copy for `url`, e.g. after it failed to parse.
    pub async fn remove(&self, url: &str) {
        let path = self.path_for(url);
        if let Err(e) = tokio::fs::remove_file(&path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove cached index {}: {}", path.display(), e);
        }
    }
}
