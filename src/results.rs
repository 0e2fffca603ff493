//! Result aggregation: scoring a whole catalog into a grouped, capped view.
//!
//! A non-blank query is scored against every entry; matches are ordered by score
//! (ties by title) and bucketed by content type. A blank query gets the curated
//! popular list instead. Quick actions close every view.

use crate::catalog::{Catalog, ContentIndexEntry, ContentType};
use crate::path::normalize_internal_href;
use crate::query::{expand_all, tokenize};
use crate::scoring::score_fields;
use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::locale;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Maximum entries displayed per content-type group.
pub const GROUP_CAP: usize = 8;

/// Canonical paths shown, in this order, when the query is blank.
pub const POPULAR_HREFS: &[&str] = &[
    "/dental-implants/",
    "/veneers/",
    "/beverly-hills-dentist/",
    "/smile-gallery/",
    "/schedule-consultation/",
];

pub const SCHEDULE_CONSULTATION_PATH: &str = "/schedule-consultation/";
pub const PHONE_NUMBER_E164: &str = "+13232722388";
pub const PHONE_NUMBER_DISPLAY: &str = "(323) 272-2388";

/// Always-available actions appended after every result set.
pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        id: "action:schedule-consultation",
        title: "Schedule Consultation",
        description: "Book online in under a minute",
        href: SCHEDULE_CONSULTATION_PATH,
    },
    QuickAction {
        id: "action:call",
        title: "Call (323) 272-2388",
        description: "Speak with our concierge team",
        href: "tel:+13232722388",
    },
];

/// A fixed, non-indexed action such as booking or calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

/// What a [`ResultView`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// The index is still being fetched.
    Loading,
    /// The index could not be loaded this session.
    IndexUnavailable,
    /// Blank query: curated popular entries.
    Popular,
    /// Non-blank query with at least one match.
    Matches,
    /// Non-blank query that nothing satisfied.
    NoMatches,
}

/// Heading of a result group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Popular,
    Type(ContentType),
}

impl GroupKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::Type(kind) => kind.label(),
        }
    }
}

/// A displayed entry. `score` is absent for popular entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    #[serde(flatten)]
    pub entry: ContentIndexEntry,
    pub score: Option<u32>,
}

impl ResultItem {
    /// Type label shown beside the row.
    pub const fn label(&self) -> &'static str {
        self.entry.kind.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultGroup {
    pub kind: GroupKind,
    pub items: Vec<ResultItem>,
}

impl ResultGroup {
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Everything a presentation layer needs to render the search surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub status: ViewStatus,
    /// Non-empty groups in display order.
    pub groups: Vec<ResultGroup>,
    /// Matches before per-group capping (popular: entries found).
    pub total_matches: usize,
    pub actions: &'static [QuickAction],
}

impl ResultView {
    fn empty(status: ViewStatus) -> Self {
        Self {
            status,
            groups: Vec::new(),
            total_matches: 0,
            actions: QUICK_ACTIONS,
        }
    }

    pub fn loading() -> Self {
        Self::empty(ViewStatus::Loading)
    }

    pub fn unavailable() -> Self {
        Self::empty(ViewStatus::IndexUnavailable)
    }

    /// Number of entries actually displayed across all groups.
    pub fn displayed(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// `true` when per-group caps hid some matches.
    pub fn is_truncated(&self) -> bool {
        self.displayed() < self.total_matches
    }

    /// Group for one content type, if it has any displayed entries.
    pub fn group(&self, kind: ContentType) -> Option<&ResultGroup> {
        self.groups
            .iter()
            .find(|group| group.kind == GroupKind::Type(kind))
    }

    /// Displayed entries in display order.
    pub fn items(&self) -> impl Iterator<Item = &ResultItem> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }
}

/// Run a raw query against a loaded catalog.
pub fn search(catalog: &Catalog, raw_query: &str) -> ResultView {
    let tokens = tokenize(raw_query);
    if tokens.is_empty() {
        return popular_view(catalog, POPULAR_HREFS);
    }

    let expanded = expand_all(&tokens);
    let mut matches: Vec<(u32, &ContentIndexEntry)> = catalog
        .indexed()
        .iter()
        .filter_map(|indexed| {
            score_fields(&indexed.fields, &expanded).map(|score| (score, &indexed.entry))
        })
        .collect();

    // Stable, so titles equal under collation keep index order.
    matches.sort_by(|(a_score, a), (b_score, b)| {
        b_score
            .cmp(a_score)
            .then_with(|| compare_titles(&a.title, &b.title))
    });

    let total_matches = matches.len();
    tracing::trace!(
        "Query {:?}: {} tokens, {} matches",
        raw_query,
        tokens.len(),
        total_matches
    );

    if total_matches == 0 {
        return ResultView::empty(ViewStatus::NoMatches);
    }

    let mut buckets: [Vec<ResultItem>; 4] = Default::default();
    for (score, entry) in matches {
        let bucket = &mut buckets[entry.kind.group_index()];
        if bucket.len() < GROUP_CAP {
            bucket.push(ResultItem {
                entry: entry.clone(),
                score: Some(score),
            });
        }
    }

    let groups = ContentType::GROUP_ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, items)| !items.is_empty())
        .map(|(kind, items)| ResultGroup {
            kind: GroupKind::Type(kind),
            items,
        })
        .collect();

    ResultView {
        status: ViewStatus::Matches,
        groups,
        total_matches,
        actions: QUICK_ACTIONS,
    }
}

/// Entries matching each reference, in reference order.
///
/// For each reference the first entry whose normalized href equals the
/// normalized reference wins; references with no entry are skipped.
pub fn popular_entries<'a>(catalog: &'a Catalog, references: &[&str]) -> Vec<&'a ContentIndexEntry> {
    references
        .iter()
        .filter_map(|reference| {
            let wanted = normalize_internal_href(reference);
            catalog
                .items()
                .find(|entry| normalize_internal_href(&entry.href) == wanted)
        })
        .collect()
}

fn popular_view(catalog: &Catalog, references: &[&str]) -> ResultView {
    let items: Vec<ResultItem> = popular_entries(catalog, references)
        .into_iter()
        .map(|entry| ResultItem {
            entry: entry.clone(),
            score: None,
        })
        .collect();

    let total_matches = items.len();
    let groups = if items.is_empty() {
        Vec::new()
    } else {
        vec![ResultGroup {
            kind: GroupKind::Popular,
            items,
        }]
    };

    ResultView {
        status: ViewStatus::Popular,
        groups,
        total_matches,
        actions: QUICK_ACTIONS,
    }
}

/// English collation on base letters only: case and accents never decide order.
static TITLE_COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Primary);
    Collator::try_new(locale!("en").into(), options).expect("compiled collation data for en")
});

fn compare_titles(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.compare(a, b)
}
