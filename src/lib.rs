//! Site-wide search for a marketing website.
//!
//! Loads a flat content index once per process, scores it against free-text queries
//! with conjunctive, field-weighted matching, groups and caps results by content type,
//! and resolves selected results to internal routes or external links.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod navigation;
pub mod path;
pub mod query;
pub mod results;
pub mod scoring;
pub mod server;
pub mod session;
pub mod tools;
pub mod tracing;

pub use catalog::{Catalog, CatalogStore, ContentIndexEntry, ContentType, IndexSource};
pub use config::SearchConfig;
pub use error::LoadError;
pub use navigation::{LinkKind, Navigator, ResolvedTarget, resolve};
pub use query::{expand, tokenize};
pub use results::{GROUP_CAP, QuickAction, ResultGroup, ResultItem, ResultView, ViewStatus, search};
pub use scoring::score;
pub use server::SearchServer;
pub use session::{SearchSession, SessionHost, SessionState};
