//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `fixture_catalog`: The parsed `tests/fixtures/search-index.json` catalog
//! - `fixture_store`: A [`CatalogStore`] reading the fixture file from disk
//! - `host`: A [`RecordingHost`] that logs navigation and focus events
//!
//! [`TempIndex`] writes an arbitrary index document into a temp directory for
//! tests that need to change or remove the file between loads.

use rstest::fixture;
use site_search::{Catalog, CatalogStore, IndexSource, Navigator, SessionHost};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path of the checked-in sample index.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/search-index.json")
}

/// Raw bytes of the checked-in sample index.
#[allow(dead_code)] // Used across different integration test crates
pub fn fixture_bytes() -> Vec<u8> {
    std::fs::read(fixture_path()).expect("Failed to read fixture index")
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_slice(&fixture_bytes()).expect("Fixture index should parse")
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn fixture_store() -> CatalogStore {
    CatalogStore::new(IndexSource::file(fixture_path()))
}

/// An index document in its own temporary directory.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempIndex {
    _temp: TempDir,
    path: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempIndex {
    /// A location with no file written yet.
    pub fn missing() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("search-index.json");
        Self { _temp: temp, path }
    }

    pub fn with_content(content: &str) -> Self {
        let index = Self::missing();
        index.write(content);
        index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents.
    ///
    /// # Panics
    /// Panics if writing fails.
    pub fn write(&self, content: &str) {
        std::fs::write(&self.path, content)
            .unwrap_or_else(|e| panic!("Failed to write '{}': {}", self.path.display(), e));
    }

    pub fn store(&self) -> CatalogStore {
        CatalogStore::new(IndexSource::file(&self.path))
    }
}

/// One side effect observed by [`RecordingHost`].
#[allow(dead_code)] // Used across different integration test crates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    AssignLocation(String),
    PushRoute(String),
    RestoreFocus(&'static str),
}

/// Session host that records every call instead of touching a real page.
#[allow(dead_code)] // Used across different integration test crates
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Element reported as focused when the session opens
    pub focused: RefCell<Option<&'static str>>,
    pub events: RefCell<Vec<HostEvent>>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl RecordingHost {
    pub fn focused_on(element: &'static str) -> Self {
        Self {
            focused: RefCell::new(Some(element)),
            events: RefCell::default(),
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<HostEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| !matches!(event, HostEvent::RestoreFocus(_)))
            .cloned()
            .collect()
    }
}

impl Navigator for RecordingHost {
    fn assign_location(&self, target: &str) {
        self.events
            .borrow_mut()
            .push(HostEvent::AssignLocation(target.to_string()));
    }

    fn push_route(&self, path: &str) {
        self.events
            .borrow_mut()
            .push(HostEvent::PushRoute(path.to_string()));
    }
}

impl SessionHost for RecordingHost {
    type Focus = &'static str;

    fn active_element(&self) -> Option<Self::Focus> {
        *self.focused.borrow()
    }

    fn restore_focus(&self, focus: Self::Focus) {
        self.events
            .borrow_mut()
            .push(HostEvent::RestoreFocus(focus));
    }
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn host() -> RecordingHost {
    RecordingHost::focused_on("search-trigger")
}
