//! The content index: a flat list of pages, services, locations and articles.
//!
//! The index is authored at build time and only consumed here. Parsing is lenient:
//! an entry that is missing a required field or fails to deserialize is skipped,
//! unknown fields are ignored, and unknown `type` values fall into the Page bucket.

pub mod source;
pub mod store;

pub use source::{IndexSource, SEARCH_INDEX_PATH};
pub use store::CatalogStore;

use crate::error::LoadError;
use crate::scoring::SearchFields;
use ahash::AHashSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of content an index entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Service,
    Location,
    /// Blog post. Serialized as `blog` to match the published index.
    #[serde(rename = "blog", alias = "article")]
    Article,
    /// Generic site page. Also the bucket for unrecognized type values.
    #[serde(other)]
    Page,
}

impl ContentType {
    /// Presentation order of result groups.
    pub const GROUP_ORDER: [Self; 4] = [Self::Service, Self::Location, Self::Page, Self::Article];

    /// Group heading shown above results of this type.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Service => "Services",
            Self::Location => "Locations",
            Self::Article => "Blog",
            Self::Page => "Pages",
        }
    }

    /// Position of this type in [`Self::GROUP_ORDER`].
    pub(crate) const fn group_index(self) -> usize {
        match self {
            Self::Service => 0,
            Self::Location => 1,
            Self::Page => 2,
            Self::Article => 3,
        }
    }
}

/// One searchable entry of the content index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIndexEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "h1", alias = "heading", skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub keywords: Vec<String>,
}

impl ContentIndexEntry {
    /// Create an entry with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        kind: ContentType,
        title: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            href: href.into(),
            description: None,
            heading: None,
            keywords: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An entry together with its lower-cased scoring fields, computed once at load.
#[derive(Debug, Clone)]
pub(crate) struct IndexedEntry {
    pub(crate) entry: ContentIndexEntry,
    pub(crate) fields: SearchFields,
}

/// Wire shape of the index document. Items stay untyped so one bad entry
/// cannot fail the whole document.
#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    version: u32,
    items: Vec<serde_json::Value>,
}

/// An immutable, parsed content index.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: u32,
    entries: Vec<IndexedEntry>,
}

impl Catalog {
    /// Build a catalog from already-validated entries.
    ///
    /// Every entry is kept; a repeated `id` is only logged.
    pub fn new(version: u32, items: impl IntoIterator<Item = ContentIndexEntry>) -> Self {
        let mut seen = AHashSet::new();
        let entries = items
            .into_iter()
            .inspect(|entry| {
                if !seen.insert(entry.id.clone()) {
                    tracing::warn!("Search index entry id '{}' is not unique", entry.id);
                }
            })
            .map(|entry| IndexedEntry {
                fields: SearchFields::new(&entry),
                entry,
            })
            .collect();

        Self { version, entries }
    }

    /// Parse an index document, skipping malformed entries.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let raw: RawCatalog =
            serde_json::from_slice(bytes).map_err(|e| LoadError::Parse(e.to_string()))?;

        let total = raw.items.len();
        let items: Vec<ContentIndexEntry> = raw
            .items
            .into_iter()
            .enumerate()
            .filter_map(|(position, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping malformed index entry #{}: {}", position, e);
                    None
                }
            })
            .collect();

        if items.len() < total {
            tracing::warn!(
                "Skipped {} of {} search index entries",
                total - items.len(),
                total
            );
        }

        Ok(Self::new(raw.version, items))
    }

    /// Informational index format version.
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Entries in index order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &ContentIndexEntry> {
        self.entries.iter().map(|indexed| &indexed.entry)
    }

    pub(crate) fn indexed(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
