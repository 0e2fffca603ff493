//! Error handling types and utilities.

/// A specialized Result type for site-search operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading the content index fails.
///
/// Cloneable because a single in-flight load is shared by every caller awaiting it.
/// None of these are fatal: the session presents them as "index unavailable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("search index request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("search index request failed: {0}")]
    Status(u16),
    /// A local index file could not be read.
    #[error("failed to read search index at {path}: {error}")]
    Io { path: String, error: String },
    /// The payload was not a valid index document.
    #[error("malformed search index: {0}")]
    Parse(String),
    /// The load was cancelled before it finished.
    #[error("search index load was aborted")]
    Aborted,
}

impl LoadError {
    pub(crate) fn request(error: &reqwest::Error) -> Self {
        Self::Request(error.to_string())
    }
}
