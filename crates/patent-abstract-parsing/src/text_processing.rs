use once_cell::sync::Lazy;
use regex::Regex;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Clean joined abstract text into a single paragraph.
///
/// In order: drop `(Continued)` markers and `(2014.01)`-style date codes,
/// drop trailing parenthesized numbers, collapse whitespace, pull
/// punctuation back onto the preceding word, and close up spaced hyphens
/// (`"bi - stable"` → `"bi-stable"`).
pub fn normalize_abstract(text: &str) -> String {
    static CONTINUED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\(\s*Continued\s*\)").unwrap());
    static DATE_CODE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\(\s*\d{4}\.\d{2}\s*\)").unwrap());
    static TRAILING_NUM_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?:\s*\(\s*\d+\s*\))+\s*$").unwrap());
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    static PUNCT_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,;.!?])").unwrap());
    static SPACED_HYPHEN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\w)\s+-\s+(\w)").unwrap());

    let text = CONTINUED_RE.replace_all(text, "");
    let text = DATE_CODE_RE.replace_all(&text, "");
    let text = TRAILING_NUM_RE.replace(&text, "");
    let text = WS_RE.replace_all(&text, " ");
    let text = PUNCT_SPACE_RE.replace_all(text.trim(), "$1");

    // Matches can't overlap, so "a - b - c" needs a second pass.
    let mut text = text.into_owned();
    while SPACED_HYPHEN_RE.is_match(&text) {
        text = SPACED_HYPHEN_RE.replace_all(&text, "${1}-${2}").into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("ﬁnding ﬂow"), "finding flow");
        assert_eq!(expand_ligatures("eﬃcient oﬄine"), "efficient offline");
        assert_eq!(expand_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn test_normalize_removes_continued() {
        assert_eq!(
            normalize_abstract("A battery module ( continued ) includes cells."),
            "A battery module includes cells."
        );
    }

    #[test]
    fn test_normalize_removes_date_codes() {
        assert_eq!(
            normalize_abstract("A relay (2013.01) couples the battery."),
            "A relay couples the battery."
        );
    }

    #[test]
    fn test_normalize_removes_trailing_paren_number() {
        assert_eq!(
            normalize_abstract("The slurry is processed. (12)"),
            "The slurry is processed."
        );
        // The whole trailing run goes, nothing earlier
        assert_eq!(
            normalize_abstract("The outlet is closed (1) (2)\n"),
            "The outlet is closed"
        );
        assert_eq!(
            normalize_abstract("Steps (1) and (2) follow."),
            "Steps (1) and (2) follow."
        );
    }

    #[test]
    fn test_normalize_whitespace_and_punctuation() {
        assert_eq!(
            normalize_abstract("  A  sensor ,\n a motor ; and\ta relay .  "),
            "A sensor, a motor; and a relay."
        );
    }

    #[test]
    fn test_normalize_spaced_hyphens() {
        assert_eq!(normalize_abstract("a bi - stable relay"), "a bi-stable relay");
        assert_eq!(normalize_abstract("key - on - off"), "key-on-off");
        // Unspaced or one-sided hyphens are left alone
        assert_eq!(normalize_abstract("HMG-CoA reductase"), "HMG-CoA reductase");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "A lithium ion battery module includes a housing .",
            "Methods (2014.01) for preparing cheese ( Continued ) are provided",
            "a - b - c  ,  d",
            "Systems, methods and/or devices are used. (5)",
            "Steps (1) (2)",
            "A filter is disposed between the inlet and the outlet (1)\n(2) ( 3 )",
        ];
        for input in inputs {
            let once = normalize_abstract(input);
            assert_eq!(normalize_abstract(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_abstract("   \n "), "");
        assert_eq!(normalize_abstract("(Continued)"), "");
    }
}
