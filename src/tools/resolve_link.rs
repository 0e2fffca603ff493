use crate::navigation::resolve;
use rmcp::schemars;
use serde::Deserialize;

/// Parameters for resolve_link tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveLinkRequest {
    /// Result href: site path, absolute URL, `tel:` or `mailto:` link
    pub href: String,
}

/// Classify a result href and report where selecting it would navigate.
pub fn handle_resolve_link(request: &ResolveLinkRequest) -> String {
    let resolved = resolve(&request.href);
    format!("{}: {}", resolved.kind, resolved.target)
}
