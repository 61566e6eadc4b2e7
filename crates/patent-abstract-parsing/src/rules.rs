//! Per-line stop and noise predicates.
//!
//! Each rule is a named pure function over a single trimmed line. Stop rules
//! end the abstract; noise rules drop just the line. The classifier walks the
//! lists in order and reports the first rule that fires.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named line predicate.
#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
}

impl LineRule {
    pub fn matches(&self, line: &str) -> bool {
        (self.applies)(line)
    }
}

/// Lines that mark the end of the abstract.
pub static STOP_RULES: &[LineRule] = &[
    LineRule {
        name: "claims_header",
        applies: is_claims_header,
    },
    LineRule {
        name: "section_header",
        applies: is_section_header,
    },
    LineRule {
        name: "references_cited",
        applies: is_references_cited,
    },
    LineRule {
        name: "classification_marker",
        applies: is_classification_marker,
    },
    LineRule {
        name: "claims_drawings_count",
        applies: has_claims_drawings_count,
    },
    LineRule {
        name: "claims_preamble",
        applies: is_claims_preamble,
    },
];

/// Lines that are layout furniture rather than abstract prose.
pub static NOISE_RULES: &[LineRule] = &[
    LineRule {
        name: "classification_code",
        applies: is_classification_code,
    },
    LineRule {
        name: "diagram_numbers",
        applies: is_diagram_numbers,
    },
    LineRule {
        name: "dotted_leaders",
        applies: has_dotted_leaders,
    },
    LineRule {
        name: "page_marker",
        applies: has_page_marker,
    },
    LineRule {
        name: "search_history",
        applies: has_search_history,
    },
    LineRule {
        name: "too_short",
        applies: is_too_short,
    },
    LineRule {
        name: "author_citation",
        applies: is_author_citation,
    },
    LineRule {
        name: "lowercase_fragment",
        applies: is_lowercase_fragment,
    },
    LineRule {
        name: "garbled_token",
        applies: is_garbled_token,
    },
    LineRule {
        name: "diagram_caption",
        applies: is_diagram_caption,
    },
    LineRule {
        name: "short_title_fragment",
        applies: is_short_title_fragment,
    },
    LineRule {
        name: "question_marks",
        applies: has_question_marks,
    },
];

/// Exact-match noise lines left behind by split citation headers.
pub const DEFAULT_NOISE_TOKENS: &[&str] =
    &["Cited", "CITED", "OCUMENTS", "DOCUMENTS", "ed", "ued"];

pub fn first_stop_rule(line: &str) -> Option<&'static LineRule> {
    STOP_RULES.iter().find(|rule| rule.matches(line))
}

pub fn first_noise_rule(line: &str) -> Option<&'static LineRule> {
    NOISE_RULES.iter().find(|rule| rule.matches(line))
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

// ── Stop rules ──

/// `"20 Claims,"` or `"Claim,"` at line start.
pub fn is_claims_header(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:\d+\s+)?Claims?\s*,").unwrap());
    RE.is_match(line)
}

pub fn is_section_header(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^(?:FIELD|BACKGROUND|BRIEF DESCRIPTION|DETAILED DESCRIPTION)").unwrap()
    });
    RE.is_match(line)
}

pub fn is_references_cited(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^References Cited").unwrap());
    RE.is_match(line)
}

/// INID codes such as `(51)` or `( 52 )` open the bibliographic block.
pub fn is_classification_marker(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\s*\d+\s*\)").unwrap());
    RE.is_match(line)
}

/// `"20 Claims, 7 Drawing Sheets"` anywhere in the line.
pub fn has_claims_drawings_count(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\d+\s+Claims?\s*,\s*\d+\s+Drawing\s+Sheets?").unwrap()
    });
    RE.is_match(line)
}

/// `"What is claimed is:"`, `"I claim:"`, `"We claim:"`.
pub fn is_claims_preamble(line: &str) -> bool {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(?:What\s+is\s+claimed|I\s+claim|We\s+claim)\b").unwrap());
    RE.is_match(line)
}

// ── Noise rules ──

/// `"32Of 138"`, `"320/109"`, `"B60L 50/64"`.
pub fn is_classification_code(line: &str) -> bool {
    static OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[Oo]f\s+\d+").unwrap());
    static SLASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+/\d+").unwrap());
    static CPC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,4}\d+[A-Z]?\s+\d").unwrap());
    OF_RE.is_match(line) || SLASH_RE.is_match(line) || CPC_RE.is_match(line)
}

/// Reference numerals from figures: only digits, spaces, hyphens and parens.
pub fn is_diagram_numbers(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-()]+$").unwrap());
    char_len(line) > 3 && RE.is_match(line)
}

pub fn has_dotted_leaders(line: &str) -> bool {
    line.matches('.').count() > 5
}

pub fn has_page_marker(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Page\s+\d+").unwrap());
    RE.is_match(line)
}

pub fn has_search_history(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)search history").unwrap());
    RE.is_match(line)
}

pub fn is_too_short(line: &str) -> bool {
    char_len(line) <= 2
}

/// `"Smith et al."`, `"Jones, Jr."`.
pub fn is_author_citation(line: &str) -> bool {
    static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bet\s+al\.?\b").unwrap());
    static SUFFIX_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i),\s+(?:Jr\.?|Sr\.?)\s*$").unwrap());
    ET_AL_RE.is_match(line) || SUFFIX_RE.is_match(line)
}

/// Short all-lowercase lines, usually the tail of an author name split by OCR.
pub fn is_lowercase_fragment(line: &str) -> bool {
    char_len(line) < 20 && is_all_lowercase(line)
}

/// At least one cased character and no uppercase ones.
fn is_all_lowercase(line: &str) -> bool {
    line.chars().any(char::is_lowercase) && !line.chars().any(char::is_uppercase)
}

/// OCR debris like `coni'i'. 4`.
pub fn is_garbled_token(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[a-z]{2,8}'[a-z]'\."?\s*\d+"#).unwrap());
    RE.is_match(line)
}

/// A lone capitalized word, typically a figure label.
pub fn is_diagram_caption(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+$").unwrap());
    char_len(line) < 25 && RE.is_match(line)
}

/// Short capitalized phrases without two runs of three or more lowercase
/// letters, e.g. `"Controller 12"` or `"FIG. 3"`.
pub fn is_short_title_fragment(line: &str) -> bool {
    static STARTS_UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]").unwrap());
    static TWO_RUNS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]{3,}.*[a-z]{3,}").unwrap());
    char_len(line) < 20
        && line.matches(' ').count() <= 2
        && STARTS_UPPER_RE.is_match(line)
        && !TWO_RUNS_RE.is_match(line)
}

/// Unrendered glyphs show up as runs of `?`; more than two also covers `"???"`.
pub fn has_question_marks(line: &str) -> bool {
    line.matches('?').count() > 2
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Stop rules ──

    #[test]
    fn test_claims_header() {
        assert!(is_claims_header("20 Claims, 7 Drawing Sheets"));
        assert!(is_claims_header("Claim, something"));
        assert!(is_claims_header("1 claim ,"));
        assert!(!is_claims_header("The claims, as filed"));
    }

    #[test]
    fn test_section_header() {
        assert!(is_section_header("FIELD OF THE INVENTION"));
        assert!(is_section_header("BACKGROUND"));
        assert!(is_section_header("Brief Description of the Drawings"));
        assert!(is_section_header("DETAILED DESCRIPTION"));
        assert!(!is_section_header("A field device includes"));
    }

    #[test]
    fn test_references_cited() {
        assert!(is_references_cited("References Cited"));
        assert!(is_references_cited("REFERENCES CITED"));
        assert!(!is_references_cited("See References Cited"));
    }

    #[test]
    fn test_classification_marker() {
        assert!(is_classification_marker("(51) Int. Cl."));
        assert!(is_classification_marker("( 52 ) U.S. Cl."));
        assert!(!is_classification_marker("(i) administration of a mixture"));
        assert!(!is_classification_marker("includes (1) receiving"));
    }

    #[test]
    fn test_claims_drawings_count() {
        assert!(has_claims_drawings_count("foo 12 Claims, 5 Drawing Sheets"));
        assert!(has_claims_drawings_count("1 Claim, 1 Drawing Sheet"));
        assert!(!has_claims_drawings_count("12 Claims"));
    }

    #[test]
    fn test_claims_preamble() {
        assert!(is_claims_preamble("What is claimed is: 1. A widget..."));
        assert!(is_claims_preamble("We claim:"));
        assert!(is_claims_preamble("I claim:"));
        assert!(!is_claims_preamble("Iclaimed nothing"));
        assert!(!is_claims_preamble("Whatever is claimed"));
    }

    #[test]
    fn test_first_stop_rule_names() {
        assert_eq!(
            first_stop_rule("(51) Int. Cl.").map(|r| r.name),
            Some("classification_marker")
        );
        assert!(first_stop_rule("A battery module includes a housing.").is_none());
    }

    // ── Noise rules ──

    #[test]
    fn test_classification_code() {
        assert!(is_classification_code("32Of 138"));
        assert!(is_classification_code("320/109"));
        assert!(is_classification_code("B60L 50/64"));
        assert!(is_classification_code("H01M 10/625"));
        assert!(!is_classification_code("A 12 volt battery"));
        assert!(!is_classification_code("Methods for preparing cheese"));
    }

    #[test]
    fn test_diagram_numbers() {
        assert!(is_diagram_numbers("102 104 106"));
        assert!(is_diagram_numbers("(10) - 12"));
        assert!(!is_diagram_numbers("12"));
        assert!(!is_diagram_numbers("102 a 106"));
    }

    #[test]
    fn test_dotted_leaders() {
        assert!(has_dotted_leaders("Smith ........ 123"));
        assert!(!has_dotted_leaders("U.S. Pat. No. 5"));
    }

    #[test]
    fn test_page_marker() {
        assert!(has_page_marker("Page 2"));
        assert!(has_page_marker("US 11,394,072 B2 page 3"));
        assert!(!has_page_marker("Pages are numbered"));
    }

    #[test]
    fn test_search_history() {
        assert!(has_search_history("See application file for complete search history."));
        assert!(has_search_history("SEARCH HISTORY"));
    }

    #[test]
    fn test_too_short() {
        assert!(is_too_short("ab"));
        assert!(is_too_short("é1"));
        assert!(!is_too_short("abc"));
    }

    #[test]
    fn test_author_citation() {
        assert!(is_author_citation("9,123,456 B2 1/2016 Smith et al."));
        assert!(is_author_citation("Jones ET AL"));
        assert!(is_author_citation("Robert Jones, Jr."));
        assert!(is_author_citation("Williams, Sr"));
        assert!(!is_author_citation("the metal alloy"));
    }

    #[test]
    fn test_lowercase_fragment() {
        assert!(is_lowercase_fragment("kowski"));
        assert!(is_lowercase_fragment("van der berg"));
        assert!(!is_lowercase_fragment("the remaining abstract text follows"));
        assert!(!is_lowercase_fragment("Kowski"));
        assert!(!is_lowercase_fragment("1234 5678"));
    }

    #[test]
    fn test_garbled_token() {
        assert!(is_garbled_token("coni'i'. 4"));
        assert!(is_garbled_token("ab'c'.\"12"));
        assert!(!is_garbled_token("don't stop"));
    }

    #[test]
    fn test_diagram_caption() {
        assert!(is_diagram_caption("Controller"));
        assert!(!is_diagram_caption("Controller unit"));
        assert!(!is_diagram_caption("CONTROLLER"));
    }

    #[test]
    fn test_short_title_fragment() {
        assert!(is_short_title_fragment("FIG. 3"));
        assert!(is_short_title_fragment("Motor 12 Out"));
        assert!(is_short_title_fragment("Sheet 12"));
        // Three spaces is one too many
        assert!(!is_short_title_fragment("Sheet 1 of 7"));
        // Two long lowercase runs keep genuine short sentences
        assert!(!is_short_title_fragment("Other aspects are"));
        // Too many spaces
        assert!(!is_short_title_fragment("A B C D"));
        // Lowercase start
        assert!(!is_short_title_fragment("x 12"));
    }

    #[test]
    fn test_question_marks() {
        assert!(has_question_marks("???"));
        assert!(has_question_marks("a?b?c?"));
        assert!(!has_question_marks("Why? Because?"));
    }

    #[test]
    fn test_abstract_prose_is_not_noise() {
        let prose = [
            "A lithium ion battery module includes a housing having a",
            "thermally conductive base and a cell assembly disposed within",
            "The present invention provides a charging device for an electric vehicle",
            "Other aspects are described.",
            "(HMG-CoA) reductase inhibitor, at least one farnesyl-pyrophosphate",
        ];
        for line in prose {
            assert!(first_noise_rule(line).is_none(), "flagged as noise: {line:?}");
            assert!(first_stop_rule(line).is_none(), "flagged as stop: {line:?}");
        }
    }
}
