use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase, drop everything that is neither a word character nor
/// whitespace, and collapse whitespace runs to single spaces.
pub fn normalize_for_comparison(text: &str) -> String {
    static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

    let lowered = text.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein distance scaled by the longer string's length in characters.
///
/// 0.0 for identical strings (including two empty ones), 1.0 when exactly
/// one side is empty.
pub fn normalized_distance(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    strsim::levenshtein(a, b) as f64 / max_len as f64
}

/// Lenient comparison used for reporting near misses.
///
/// After normalization, either text contains the other, or at least 80% of
/// the expected words appear in the actual text. An empty side never matches.
pub fn abstracts_match(expected: &str, actual: &str) -> bool {
    let expected = normalize_for_comparison(expected);
    let actual = normalize_for_comparison(actual);
    if expected.is_empty() || actual.is_empty() {
        return false;
    }
    if expected.contains(&actual) || actual.contains(&expected) {
        return true;
    }

    let expected_words: HashSet<&str> = expected.split(' ').collect();
    let actual_words: HashSet<&str> = actual.split(' ').collect();
    let overlap = expected_words.intersection(&actual_words).count();
    overlap as f64 / expected_words.len() as f64 >= 0.8
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize_for_comparison ──

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_for_comparison("Hello, World!"), "hello world");
        assert_eq!(
            normalize_for_comparison(
                "A patent (US123) includes: sensors, motors, and controllers."
            ),
            "a patent us123 includes sensors motors and controllers"
        );
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_for_comparison("hello    world"), "hello world");
        assert_eq!(normalize_for_comparison("hello\nworld"), "hello world");
        assert_eq!(normalize_for_comparison("  "), "");
    }

    #[test]
    fn test_normalize_keeps_underscores_and_unicode_letters() {
        assert_eq!(normalize_for_comparison("Über_Modul — Teil"), "über_modul teil");
    }

    // ── normalized_distance ──

    #[test]
    fn test_distance_edge_cases() {
        assert_eq!(normalized_distance("", ""), 0.0);
        assert_eq!(normalized_distance("hello", ""), 1.0);
        assert_eq!(normalized_distance("", "world"), 1.0);
        assert_eq!(normalized_distance("hello", "hello"), 0.0);
    }

    #[test]
    fn test_distance_single_edits() {
        assert!((normalized_distance("helo", "hello") - 0.2).abs() < 1e-9);
        assert!((normalized_distance("hello", "hallo") - 0.2).abs() < 1e-9);
        assert!((normalized_distance("kitten", "sitting") - 3.0 / 7.0).abs() < 1e-9);
        assert_eq!(normalized_distance("abc", "xyz"), 1.0);
    }

    #[test]
    fn test_distance_counts_characters_not_bytes() {
        assert!((normalized_distance("café", "cafe") - 0.25).abs() < 1e-9);
    }

    // ── abstracts_match ──

    #[test]
    fn test_abstracts_match_substring() {
        assert!(abstracts_match(
            "A battery module includes a housing.",
            "a battery module includes a housing having a base"
        ));
        assert!(abstracts_match(
            "A relay couples the battery to the load.",
            "relay couples the battery"
        ));
    }

    #[test]
    fn test_abstracts_match_word_overlap() {
        // 4 of 5 expected words present
        assert!(abstracts_match("alpha beta gamma delta epsilon", "epsilon delta gamma beta zeta"));
        // 3 of 5
        assert!(!abstracts_match("alpha beta gamma delta epsilon", "epsilon delta gamma eta zeta"));
    }

    #[test]
    fn test_abstracts_match_empty_never_matches() {
        assert!(!abstracts_match("", "anything"));
        assert!(!abstracts_match("A battery module.", ""));
        assert!(!abstracts_match("...", "!!!"));
    }
}
