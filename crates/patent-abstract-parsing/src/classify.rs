use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AbstractConfig;
use crate::rules::{self, DEFAULT_NOISE_TOKENS};

/// Classification of a single line after the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Keep,
    Noise,
    /// End of the abstract; nothing after this line is classified.
    Stop,
    /// Carried a `(Continued)` marker; any text before the marker is kept.
    ContinuationMarker,
    /// Dropped while waiting for the abstract to resume after a marker.
    Suppressed,
}

/// Whether the classifier is waiting for text to resume after `(Continued)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContinuationState {
    #[default]
    Collecting,
    AwaitingResumption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub tag: LineTag,
    /// Name of the rule that produced the tag, if any.
    pub rule: Option<&'static str>,
}

impl LineRecord {
    fn new(text: &str, tag: LineTag, rule: Option<&'static str>) -> Self {
        Self {
            text: text.to_string(),
            tag,
            rule,
        }
    }

    /// The text this line contributes to the abstract.
    pub fn kept_text(&self) -> Option<&str> {
        match self.tag {
            LineTag::Keep => Some(&self.text),
            LineTag::ContinuationMarker if !self.text.is_empty() => Some(&self.text),
            _ => None,
        }
    }
}

/// Applies continuation handling, stop rules and noise rules to lines.
///
/// Built-in rules come from [`crate::rules`]; the config adds noise tokens
/// and extra patterns.
pub struct LineClassifier<'c> {
    noise_tokens: HashSet<String>,
    extra_noise: &'c [Regex],
    extra_stop: &'c [Regex],
}

impl<'c> LineClassifier<'c> {
    pub fn new(config: &'c AbstractConfig) -> Self {
        let defaults: Vec<String> = DEFAULT_NOISE_TOKENS.iter().map(|s| s.to_string()).collect();
        Self {
            noise_tokens: config.noise_tokens.resolve(&defaults).into_iter().collect(),
            extra_noise: &config.extra_noise_patterns,
            extra_stop: &config.extra_stop_patterns,
        }
    }

    /// Classify one trimmed, non-empty line given the current continuation
    /// state, returning the record and the next state.
    pub fn classify(
        &self,
        line: &str,
        state: ContinuationState,
    ) -> (LineRecord, ContinuationState) {
        if let Some(before) = strip_continued_marker(line) {
            return (
                LineRecord::new(before, LineTag::ContinuationMarker, None),
                ContinuationState::AwaitingResumption,
            );
        }

        if state == ContinuationState::AwaitingResumption {
            match resumption(line) {
                Resumption::PageMarker => {
                    return (
                        LineRecord::new(line, LineTag::Suppressed, Some("resume_page_marker")),
                        ContinuationState::Collecting,
                    );
                }
                Resumption::Text => {}
                Resumption::None => {
                    return (
                        LineRecord::new(line, LineTag::Suppressed, Some("awaiting_continuation")),
                        ContinuationState::AwaitingResumption,
                    );
                }
            }
        }

        let state = ContinuationState::Collecting;

        if let Some(rule) = rules::first_stop_rule(line) {
            return (LineRecord::new(line, LineTag::Stop, Some(rule.name)), state);
        }
        if self.extra_stop.iter().any(|re| re.is_match(line)) {
            return (LineRecord::new(line, LineTag::Stop, Some("custom_stop")), state);
        }

        if let Some(rule) = rules::first_noise_rule(line) {
            return (LineRecord::new(line, LineTag::Noise, Some(rule.name)), state);
        }
        if self.noise_tokens.contains(line) {
            return (LineRecord::new(line, LineTag::Noise, Some("noise_token")), state);
        }
        if self.extra_noise.iter().any(|re| re.is_match(line)) {
            return (LineRecord::new(line, LineTag::Noise, Some("custom_noise")), state);
        }

        (LineRecord::new(line, LineTag::Keep, None), state)
    }

    /// Classify every line of a sliced section, in order, up to and including
    /// the first stop line.
    pub fn classify_section(&self, section: &str) -> Vec<LineRecord> {
        let mut records = Vec::new();
        let mut state = ContinuationState::default();

        for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (record, next) = self.classify(line, state);
            state = next;
            let stop = record.tag == LineTag::Stop;
            records.push(record);
            if stop {
                tracing::trace!(line, "stop line reached");
                break;
            }
        }

        records
    }
}

/// Kept abstract lines from a sliced section, using the default rules.
pub fn collect_abstract_lines(section: &str) -> Vec<String> {
    let config = AbstractConfig::default();
    kept_lines(&LineClassifier::new(&config).classify_section(section))
}

/// The surviving text of each record, in order.
pub fn kept_lines(records: &[LineRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.kept_text().map(str::to_string))
        .collect()
}

/// If the line carries a `(Continued)` marker, the trimmed text before it.
fn strip_continued_marker(line: &str) -> Option<&str> {
    static CONTINUED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\(\s*Continued\s*\)").unwrap());
    let m = CONTINUED_RE.find(line)?;
    Some(line[..m.start()].trim())
}

#[derive(Debug, PartialEq, Eq)]
enum Resumption {
    None,
    /// Substantial lowercase text picking up mid-sentence.
    Text,
    /// A `Page N` header opening the next page; the line itself is dropped.
    PageMarker,
}

fn resumption(line: &str) -> Resumption {
    static PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Page\s+\d+").unwrap());

    if line.starts_with(|c: char| c.is_ascii_lowercase()) && line.chars().count() > 30 {
        Resumption::Text
    } else if PAGE_RE.is_match(line) {
        Resumption::PageMarker
    } else {
        Resumption::None
    }
}
