//! Site search handler and plain-text rendering of result views.

use crate::catalog::CatalogStore;
use crate::results::{ResultView, ViewStatus, search};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query. Leave empty to list popular pages.
    #[serde(default)]
    pub query: String,
}

/// Run a query against the shared index, loading it on first use.
///
/// Index failures are reported in the rendered text rather than as errors.
pub async fn handle_search(store: &CatalogStore, request: SearchRequest) -> String {
    let view = match store.load().await {
        Ok(catalog) => search(&catalog, &request.query),
        Err(e) => {
            tracing::warn!("Search requested but index unavailable: {}", e);
            ResultView::unavailable()
        }
    };

    format_result_view(&view, &request.query)
}

/// Render a result view the way the search surface lays it out.
pub fn format_result_view(view: &ResultView, query: &str) -> String {
    let mut output = String::new();

    match view.status {
        ViewStatus::Loading => output.push_str("Loading search…\n\n"),
        ViewStatus::IndexUnavailable => {
            output.push_str("Search is unavailable right now. No results.\n\n");
        }
        ViewStatus::NoMatches => {
            let _ = writeln!(output, "No results found for '{}'.\n", query.trim());
        }
        ViewStatus::Popular => {}
        ViewStatus::Matches => {
            let _ = write!(output, "{} result", view.total_matches);
            if view.total_matches != 1 {
                output.push('s');
            }
            let _ = write!(output, " for '{}'", query.trim());
            if view.is_truncated() {
                let _ = write!(output, " (showing {})", view.displayed());
            }
            output.push_str(":\n\n");
        }
    }

    for group in &view.groups {
        let _ = writeln!(output, "{}:", group.label());
        for item in &group.items {
            let _ = write!(output, "  • {} - {}", item.entry.title, item.entry.href);
            if let Some(score) = item.score {
                let _ = write!(output, " [{}, score {}]", item.label(), score);
            }
            output.push('\n');
            if let Some(description) = &item.entry.description {
                let _ = writeln!(output, "    {}", description);
            }
        }
        output.push('\n');
    }

    output.push_str("Actions:\n");
    for action in view.actions {
        let _ = writeln!(
            output,
            "  • {} - {} ({})",
            action.title, action.href, action.description
        );
    }

    output
}
