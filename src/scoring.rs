//! Conjunctive, field-weighted relevance scoring.
//!
//! Every query token must match at least one field of an entry, under any of its
//! synonym variants, or the entry does not match at all. Each token contributes the
//! weight of the highest-priority field it matched; contributions are summed with no
//! normalization for query or field length.

use crate::catalog::ContentIndexEntry;
use crate::query::expand_all;

/// Title starts with a variant.
pub const TITLE_PREFIX: u32 = 12;
/// Title contains a variant.
pub const TITLE: u32 = 10;
/// Heading starts with a variant.
pub const HEADING_PREFIX: u32 = 9;
/// Heading contains a variant.
pub const HEADING: u32 = 7;
pub const KEYWORDS: u32 = 6;
pub const DESCRIPTION: u32 = 3;
pub const HREF: u32 = 1;

/// Lower-cased views of the fields an entry is scored on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFields {
    title: String,
    heading: String,
    keywords: String,
    description: String,
    href: String,
}

impl SearchFields {
    pub fn new(entry: &ContentIndexEntry) -> Self {
        Self {
            title: entry.title.to_lowercase(),
            heading: entry.heading.as_deref().unwrap_or_default().to_lowercase(),
            keywords: entry.keywords.join(" ").to_lowercase(),
            description: entry
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase(),
            href: entry.href.to_lowercase(),
        }
    }
}

/// Score one entry against a token list.
///
/// Returns `None` when any token fails to match. An empty token list scores
/// `Some(0)`; callers route blank queries to the popular fallback instead.
pub fn score(entry: &ContentIndexEntry, tokens: &[String]) -> Option<u32> {
    score_fields(&SearchFields::new(entry), &expand_all(tokens))
}

/// Score pre-computed fields against pre-expanded tokens.
pub(crate) fn score_fields(fields: &SearchFields, expanded: &[Vec<String>]) -> Option<u32> {
    expanded
        .iter()
        .try_fold(0, |total, variants| Some(total + token_score(fields, variants)?))
}

/// Weight of the first field, in priority order, containing any variant.
fn token_score(fields: &SearchFields, variants: &[String]) -> Option<u32> {
    if let Some(variant) = first_contained(&fields.title, variants) {
        return Some(if fields.title.starts_with(variant) {
            TITLE_PREFIX
        } else {
            TITLE
        });
    }

    if let Some(variant) = first_contained(&fields.heading, variants) {
        return Some(if fields.heading.starts_with(variant) {
            HEADING_PREFIX
        } else {
            HEADING
        });
    }

    if first_contained(&fields.keywords, variants).is_some() {
        return Some(KEYWORDS);
    }

    if first_contained(&fields.description, variants).is_some() {
        return Some(DESCRIPTION);
    }

    if first_contained(&fields.href, variants).is_some() {
        return Some(HREF);
    }

    None
}

/// The prefix bonus is judged on the first variant found, not on any variant.
fn first_contained<'a>(text: &str, variants: &'a [String]) -> Option<&'a str> {
    variants
        .iter()
        .map(String::as_str)
        .find(|variant| text.contains(variant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentType;
    use assert2::check;
    use rstest::rstest;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(ToString::to_string).collect()
    }

    fn page(title: &str) -> ContentIndexEntry {
        ContentIndexEntry::new("id", ContentType::Page, title, "/page/")
    }

    #[rstest]
    #[case(page("Veneers in Los Angeles"), TITLE_PREFIX)]
    #[case(page("Porcelain Veneers"), TITLE)]
    #[case(page("About").with_heading("Veneers done right"), HEADING_PREFIX)]
    #[case(page("About").with_heading("Custom veneers"), HEADING)]
    #[case(page("About").with_keywords(["smile", "Veneers"]), KEYWORDS)]
    #[case(page("About").with_description("We place veneers daily"), DESCRIPTION)]
    #[case(ContentIndexEntry::new("id", ContentType::Service, "About", "/Veneers/"), HREF)]
    fn test_field_weights(#[case] entry: ContentIndexEntry, #[case] expected: u32) {
        check!(score(&entry, &tokens(&["veneers"])) == Some(expected));
    }

    #[test]
    fn test_highest_priority_field_wins() {
        let entry = page("Veneers")
            .with_heading("Veneers")
            .with_keywords(["veneers"])
            .with_description("veneers");
        check!(score(&entry, &tokens(&["veneers"])) == Some(TITLE_PREFIX));
    }

    #[test]
    fn test_contributions_are_summed() {
        let entry = page("Dental Implants").with_description("Implant dentistry in Beverly Hills");
        // "dental" title prefix, "implants" title, "beverly" description
        check!(
            score(&entry, &tokens(&["dental", "implants", "beverly"]))
                == Some(TITLE_PREFIX + TITLE + DESCRIPTION)
        );
    }

    #[test]
    fn test_repeated_token_scores_twice() {
        let entry = page("Veneers");
        check!(score(&entry, &tokens(&["veneers", "veneers"])) == Some(2 * TITLE_PREFIX));
    }

    #[test]
    fn test_conjunctive_matching() {
        let entry = page("Porcelain Veneers").with_description("Beverly Hills");
        check!(score(&entry, &tokens(&["veneers"])).is_some());
        check!(score(&entry, &tokens(&["veneers", "implants"])).is_none());
        check!(score(&entry, &tokens(&["implants", "veneers"])).is_none());
    }

    #[test]
    fn test_substring_matching() {
        // Tokens match anywhere in a field, including inside words.
        check!(score(&page("Implantology"), &tokens(&["plant"])) == Some(TITLE));
    }

    #[test]
    fn test_title_beats_description() {
        let in_title = page("Whitening");
        let in_description = page("Services").with_description("whitening");
        let title_score = score(&in_title, &tokens(&["whitening"])).unwrap();
        let description_score = score(&in_description, &tokens(&["whitening"])).unwrap();
        check!(title_score > description_score);
    }

    #[test]
    fn test_synonym_equivalence() {
        let entry = page("Client Stories");
        let via_synonym = score(&entry, &tokens(&["patient"]));
        let direct = score(&entry, &tokens(&["client"]));
        check!(via_synonym == direct);
        check!(direct == Some(TITLE_PREFIX));
    }

    #[test]
    fn test_prefix_judged_on_first_variant_found() {
        // "patient" is tried first and found mid-title, so no prefix bonus even
        // though the title starts with the synonym "client".
        let entry = page("Client and patient care");
        check!(score(&entry, &tokens(&["patient"])) == Some(TITLE));
    }

    #[test]
    fn test_missing_optional_fields_do_not_match() {
        let entry = page("About");
        check!(score(&entry, &tokens(&["veneers"])).is_none());
    }

    #[test]
    fn test_empty_token_list() {
        check!(score(&page("About"), &[]) == Some(0));
    }
}
