//! Site path normalization.
//!
//! Every page on the site is served from a directory URL (`/veneers/`), so internal
//! links are canonicalized to carry a trailing slash before the query string.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `http://`, `https://` or protocol-relative `//`.
pub(crate) static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?:)?//").expect("valid absolute URL pattern"));

/// `mailto:` and `tel:` links.
pub(crate) static CONTACT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(mailto|tel):").expect("valid contact scheme pattern"));

/// Last path segment looks like a file (`/robots.txt`, `/img/a.webp`).
static FILE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[^/]+\.[^/]+$").expect("valid file segment pattern"));

/// Returns `true` for hrefs that leave the site's router: absolute URLs and contact schemes.
pub fn is_external_href(href: &str) -> bool {
    ABSOLUTE_URL.is_match(href) || CONTACT_SCHEME.is_match(href)
}

/// Normalize an internal href to its canonical trailing-slash form.
///
/// - `/veneers` → `/veneers/`
/// - `/veneers?ref=nav#top` → `/veneers/?ref=nav#top`
/// - `/`, `/veneers/`, `/sitemap.xml` are returned unchanged
/// - fragments, external URLs, contact links and relative paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no change is needed.
pub fn normalize_internal_href(href: &str) -> Cow<'_, str> {
    if href.is_empty() || href.starts_with('#') || is_external_href(href) {
        return Cow::Borrowed(href);
    }
    if !href.starts_with('/') {
        return Cow::Borrowed(href);
    }

    let split = href.find(['?', '#']).unwrap_or(href.len());
    let (pathname, suffix) = href.split_at(split);

    if pathname == "/" || pathname.ends_with('/') || FILE_SEGMENT.is_match(pathname) {
        return Cow::Borrowed(href);
    }

    Cow::Owned(format!("{}/{}", pathname, suffix))
}
