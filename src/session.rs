//! Search surface session: the state machine binding the index, the query and
//! navigation together.
//!
//! ```text
//! Closed --open--> Opening --> Ready --edit--> Searching --edit--> Searching
//!   ^                            |                 |
//!   +-------- close / select ----+-----------------+
//! ```
//!
//! Opening captures the focused element, clears the query and starts the index load
//! if the shared store has not got it yet. Every edit recomputes the result view
//! synchronously. Closing cancels an outstanding load, discards its eventual result
//! and restores focus.

use crate::catalog::{Catalog, CatalogStore};
use crate::error::LoadError;
use crate::navigation::{LinkKind, Navigator, ResolvedTarget, dispatch, resolve};
use crate::results::{ResultView, search};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Host environment the session drives: navigation plus focus bookkeeping.
pub trait SessionHost: Navigator {
    /// Opaque handle to a focusable element.
    type Focus;

    /// Element holding keyboard focus right now, if any.
    fn active_element(&self) -> Option<Self::Focus>;

    /// Give focus back to an element captured by [`Self::active_element`].
    fn restore_focus(&self, focus: Self::Focus);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Opening,
    /// Open with an empty query.
    Ready,
    /// Open with a query edited since opening.
    Searching,
}

/// What the session knows about the index.
#[derive(Debug, Clone)]
enum IndexStatus {
    /// Never requested, or the request was abandoned on close.
    Unloaded,
    Loading,
    Unavailable(LoadError),
    Ready(Arc<Catalog>),
}

/// A load started by this session.
struct PendingLoad {
    cancel: CancellationToken,
    result: oneshot::Receiver<Result<Arc<Catalog>, LoadError>>,
}

pub struct SearchSession<H: SessionHost> {
    store: CatalogStore,
    host: H,
    state: SessionState,
    query: String,
    index: IndexStatus,
    pending: Option<PendingLoad>,
    return_focus: Option<H::Focus>,
}

impl<H: SessionHost> std::fmt::Debug for SearchSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("state", &self.state)
            .field("query", &self.query)
            .field("index", &self.index)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl<H: SessionHost> SearchSession<H> {
    pub fn new(store: CatalogStore, host: H) -> Self {
        Self {
            store,
            host,
            state: SessionState::Closed,
            query: String::new(),
            index: IndexStatus::Unloaded,
            pending: None,
            return_focus: None,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn is_open(&self) -> bool {
        !matches!(self.state, SessionState::Closed)
    }

    /// `true` while this session is waiting on the index fetch.
    pub fn is_loading(&mut self) -> bool {
        self.poll_load();
        matches!(self.index, IndexStatus::Loading)
    }

    /// The error from the last failed load, if the index is unavailable.
    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.index {
            IndexStatus::Unavailable(e) => Some(e),
            _ => None,
        }
    }

    /// Activate the search surface. Must be called within a Tokio runtime.
    ///
    /// Opening an already open session does nothing.
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }

        self.transition(SessionState::Opening);
        self.return_focus = self.host.active_element();
        self.query.clear();

        if let Some(catalog) = self.store.cached() {
            self.index = IndexStatus::Ready(catalog);
        } else if !matches!(self.index, IndexStatus::Ready(_)) {
            self.start_load();
        }

        self.transition(SessionState::Ready);
    }

    /// Replace the query text and recompute results.
    ///
    /// Edits while closed are ignored.
    pub fn set_query(&mut self, query: impl Into<String>) -> ResultView {
        if self.is_open() {
            self.query = query.into();
            self.transition(SessionState::Searching);
        } else {
            tracing::debug!("Ignoring query edit on a closed search session");
        }
        self.results()
    }

    /// Result view for the current query and index state.
    pub fn results(&mut self) -> ResultView {
        self.poll_load();
        match &self.index {
            IndexStatus::Loading => ResultView::loading(),
            IndexStatus::Unloaded | IndexStatus::Unavailable(_) => ResultView::unavailable(),
            IndexStatus::Ready(catalog) => search(catalog, &self.query),
        }
    }

    /// Wait for this session's outstanding index load, if any.
    pub async fn wait_for_index(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let outcome = pending.result.await;
        self.apply_load(outcome.unwrap_or(Err(LoadError::Aborted)));
    }

    /// Close the surface (explicit close or escape).
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }

        if let Some(pending) = self.pending.take() {
            tracing::debug!("Cancelling search index load on close");
            pending.cancel.cancel();
            if matches!(self.index, IndexStatus::Loading) {
                self.index = IndexStatus::Unloaded;
            }
        }

        self.transition(SessionState::Closed);
        if let Some(focus) = self.return_focus.take() {
            self.host.restore_focus(focus);
        }
    }

    /// Open a result: close the surface first, then navigate.
    ///
    /// External targets are dispatched one scheduler turn after closing so the
    /// close side effects run to completion first.
    pub async fn select(&mut self, href: &str) -> ResolvedTarget {
        let target = resolve(href);
        self.close();

        if target.kind == LinkKind::External {
            tokio::task::yield_now().await;
        }
        dispatch(&self.host, &target);
        target
    }

    fn start_load(&mut self) {
        let cancel = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        let store = self.store.clone();
        let token = cancel.clone();

        tokio::spawn(async move {
            let result = store.load_cancellable(&token).await;
            // The receiver is gone once the session closed; the result is stale.
            let _ = tx.send(result);
        });

        self.index = IndexStatus::Loading;
        self.pending = Some(PendingLoad { cancel, result: rx });
    }

    fn poll_load(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let outcome = match pending.result.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(LoadError::Aborted),
        };

        self.pending = None;
        self.apply_load(outcome);
    }

    fn apply_load(&mut self, outcome: Result<Arc<Catalog>, LoadError>) {
        self.index = match outcome {
            Ok(catalog) => IndexStatus::Ready(catalog),
            Err(e) => {
                tracing::debug!("Search session has no index: {}", e);
                IndexStatus::Unavailable(e)
            }
        };
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::trace!("Search session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

impl<H: SessionHost> Drop for SearchSession<H> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }
}
