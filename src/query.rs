//! Query normalization and synonym expansion.

use ahash::AHashMap;
use std::sync::LazyLock;

/// Domain synonyms. Each pair is listed under both keys so lookups are symmetric.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("client", &["patient", "patients"]),
    ("clients", &["patient", "patients"]),
    ("patient", &["client", "clients"]),
    ("patients", &["client", "clients"]),
];

static SYNONYM_TABLE: LazyLock<AHashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| SYNONYMS.iter().copied().collect());

/// Split raw query text into lower-case ASCII alphanumeric tokens.
///
/// Every run of other characters acts as a single separator, so `""`, `"   "` and
/// `"!!!"` all produce an empty list. Duplicates are kept in order.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Expand a token into itself followed by its synonyms, without duplicates.
pub fn expand(token: &str) -> Vec<String> {
    let mut variants = vec![token.to_owned()];
    if let Some(synonyms) = SYNONYM_TABLE.get(token) {
        for synonym in *synonyms {
            if !variants.iter().any(|v| v == synonym) {
                variants.push((*synonym).to_owned());
            }
        }
    }
    variants
}

/// Expand every token of a query once, ahead of scoring a whole catalog.
pub(crate) fn expand_all(tokens: &[String]) -> Vec<Vec<String>> {
    tokens.iter().map(|token| expand(token)).collect()
}
