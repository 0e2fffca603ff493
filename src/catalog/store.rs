//! Process-wide, fetch-once cache of the content index.
//!
//! The first caller starts the fetch as a shared future; callers arriving while it
//! is outstanding await the same future instead of fetching again. A successful
//! result is kept for the life of the store. Failures are not kept, so the next
//! load re-attempts the fetch.

use super::{Catalog, IndexSource};
use crate::config::SearchConfig;
use crate::error::{LoadError, Result};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;

/// Type alias for the shared index fetch.
type SharedLoad = Shared<BoxFuture<'static, std::result::Result<Arc<Catalog>, LoadError>>>;

/// Cloneable handle to the shared catalog cache.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    source: IndexSource,

    /// Loaded catalog; write-once per successful fetch
    catalog: RwLock<Option<Arc<Catalog>>>,

    /// Outstanding fetch tagged with its generation
    in_flight: Mutex<Option<(u64, SharedLoad)>>,

    next_generation: AtomicU64,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("source", &self.inner.source.describe())
            .field("loaded", &self.cached().is_some())
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl CatalogStore {
    pub fn new(source: IndexSource) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                source,
                catalog: RwLock::new(None),
                in_flight: Mutex::new(None),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self::new(IndexSource::from_config(config)?))
    }

    pub fn source(&self) -> &IndexSource {
        &self.inner.source
    }

    /// The loaded catalog, without triggering a fetch.
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Get the catalog, fetching it if this is the first request.
    ///
    /// This is the main entry point. It:
    /// 1. Returns the cached catalog if present
    /// 2. Joins the outstanding fetch if there is one
    /// 3. Starts a new fetch otherwise
    pub async fn load(&self) -> std::result::Result<Arc<Catalog>, LoadError> {
        match self.begin() {
            Ok(catalog) => Ok(catalog),
            Err(pending) => pending.await,
        }
    }

    /// Like [`Self::load`], but gives up with [`LoadError::Aborted`] once `cancel` fires.
    ///
    /// A cancelled caller stops awaiting the shared fetch; if no one else is waiting
    /// on it, the fetch itself is dropped, which aborts the request.
    pub async fn load_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<Arc<Catalog>, LoadError> {
        let pending = match self.begin() {
            Ok(catalog) => return Ok(catalog),
            Err(pending) => pending,
        };

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = pending.clone() => Some(result),
        };

        if let Some(result) = outcome {
            return result;
        }

        drop(pending);
        self.abandon_if_unwatched();
        Err(LoadError::Aborted)
    }

    /// Return the cached catalog, or the fetch to await for it.
    fn begin(&self) -> std::result::Result<Arc<Catalog>, SharedLoad> {
        if let Some(catalog) = self.cached() {
            tracing::debug!("Search index cache hit");
            return Ok(catalog);
        }

        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // A fetch may have completed between the cache check and taking the lock.
        if let Some(catalog) = self.cached() {
            return Ok(catalog);
        }

        if let Some((_, pending)) = in_flight.as_ref() {
            tracing::debug!("Awaiting in-flight search index load");
            return Err(pending.clone());
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let fetch: BoxFuture<'static, _> = Box::pin(async move {
            let result = inner.source.fetch().await.map(Arc::new);

            match &result {
                Ok(catalog) => {
                    *inner
                        .catalog
                        .write()
                        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(catalog));
                }
                Err(e) => {
                    tracing::warn!(
                        "Search index unavailable ({}): {}",
                        inner.source.describe(),
                        e
                    );
                }
            }

            let mut in_flight = inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if in_flight.as_ref().is_some_and(|(g, _)| *g == generation) {
                *in_flight = None;
            }

            result
        });

        let shared = fetch.shared();
        *in_flight = Some((generation, shared.clone()));
        tracing::debug!("Starting search index load from {}", self.inner.source.describe());

        Err(shared)
    }

    /// Drop the outstanding fetch if the store holds its only handle.
    fn abandon_if_unwatched(&self) {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if in_flight
            .as_ref()
            .is_some_and(|(_, pending)| pending.strong_count() == Some(1))
        {
            tracing::debug!("Aborting search index load; no callers remain");
            *in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn index_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const INDEX: &str = r#"{"version":1,"items":[{"id":"a","type":"page","title":"A","href":"/a/"}]}"#;

    #[tokio::test]
    async fn test_load_caches_catalog() {
        let file = index_file(INDEX);
        let store = CatalogStore::new(IndexSource::file(file.path()));
        check!(store.cached().is_none());

        let first = store.load().await.unwrap();
        check!(first.len() == 1);
        check!(!store.is_loading());

        // Served from memory even after the file disappears.
        drop(file);
        let second = store.load().await.unwrap();
        check!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("search-index.json");
        let store = CatalogStore::new(IndexSource::file(&path));

        let_assert!(Err(LoadError::Io { .. }) = store.load().await);
        check!(store.cached().is_none());
        check!(!store.is_loading());

        std::fs::write(&path, INDEX).unwrap();
        check!(store.load().await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_aborts() {
        let file = index_file(INDEX);
        let store = CatalogStore::new(IndexSource::file(file.path()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let_assert!(Err(LoadError::Aborted) = store.load_cancellable(&cancel).await);
        check!(store.cached().is_none());
        check!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_cancellable_returns_cached_even_when_cancelled() {
        let file = index_file(INDEX);
        let store = CatalogStore::new(IndexSource::file(file.path()));
        store.load().await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        check!(store.load_cancellable(&cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let file = index_file(INDEX);
        let store = CatalogStore::new(IndexSource::file(file.path()));
        let other = store.clone();
        store.load().await.unwrap();
        check!(other.cached().is_some());
    }
}
