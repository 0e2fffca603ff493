//! Classifying result targets and handing them to the host's navigation primitives.

use crate::path::{is_external_href, normalize_internal_href};
use serde::Serialize;
use std::fmt;

/// How a target must be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Handled by the client-side router.
    Internal,
    /// Leaves the current document: other origins, `mailto:`, `tel:`.
    External,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("internal"),
            Self::External => f.write_str("external"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub target: String,
    pub kind: LinkKind,
}

/// Classify `href`. External targets pass through unchanged; internal ones are
/// normalized to their canonical path.
pub fn resolve(href: &str) -> ResolvedTarget {
    if is_external_href(href) {
        return ResolvedTarget {
            target: href.to_string(),
            kind: LinkKind::External,
        };
    }

    ResolvedTarget {
        target: normalize_internal_href(href).into_owned(),
        kind: LinkKind::Internal,
    }
}

/// The host's two navigation primitives.
pub trait Navigator {
    /// Full-page navigation away from the current document.
    fn assign_location(&self, url: &str);

    /// Client-side route change without a reload.
    fn push_route(&self, path: &str);
}

/// Send a resolved target to the matching primitive.
pub fn dispatch<N: Navigator + ?Sized>(navigator: &N, target: &ResolvedTarget) {
    tracing::debug!("Navigating to {} target {}", target.kind, target.target);
    match target.kind {
        LinkKind::External => navigator.assign_location(&target.target),
        LinkKind::Internal => navigator.push_route(&target.target),
    }
}
