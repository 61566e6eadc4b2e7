//! Scores an abstract extractor against a labelled corpus.
//!
//! The extractor is a black box `Fn(&Path) -> String` that returns an empty
//! string when it finds nothing. Each case is compared after
//! [`normalize_for_comparison`]: exact equality drives accuracy, and
//! [`normalized_distance`] gives the average edit distance.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub mod corpus;
pub mod metrics;

pub use corpus::{Case, Corpus};
pub use metrics::{abstracts_match, normalize_for_comparison, normalized_distance};

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("failed to read corpus {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid corpus: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Outcome for one corpus case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub label: String,
    pub path: PathBuf,
    pub expected: String,
    pub actual: String,
    /// Normalized edit distance, 0.0 (identical) to 1.0.
    pub distance: f64,
    /// Normalized texts are equal.
    pub exact: bool,
    /// Passes the lenient [`abstracts_match`] comparison.
    pub lenient: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Fraction of cases with an exact normalized match.
    pub accuracy: f64,
    pub avg_distance: f64,
    /// Fraction of cases passing the lenient comparison.
    pub lenient_accuracy: f64,
    pub cases: Vec<CaseResult>,
}

impl EvaluationReport {
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.exact)
    }
}

/// Progress events emitted while a corpus is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalProgress {
    Started { total: usize },
    CaseFinished { index: usize, total: usize, exact: bool },
}

/// Evaluate `parser` over every case in `corpus`.
///
/// An empty corpus yields a report of zeros.
pub fn evaluate<F>(corpus: &Corpus, parser: F) -> EvaluationReport
where
    F: Fn(&Path) -> String,
{
    evaluate_with_progress(corpus, parser, |_| {})
}

/// [`evaluate`] with a callback invoked before the first case and after each one.
pub fn evaluate_with_progress<F>(
    corpus: &Corpus,
    parser: F,
    progress: impl Fn(EvalProgress),
) -> EvaluationReport
where
    F: Fn(&Path) -> String,
{
    let total = corpus.len();
    progress(EvalProgress::Started { total });
    if total == 0 {
        return EvaluationReport::default();
    }

    let mut cases = Vec::with_capacity(total);
    for (index, case) in corpus.cases.iter().enumerate() {
        let actual = parser(&case.path);
        let expected_norm = normalize_for_comparison(&case.expected);
        let actual_norm = normalize_for_comparison(&actual);

        let result = CaseResult {
            label: case.label(),
            path: case.path.clone(),
            distance: normalized_distance(&expected_norm, &actual_norm),
            exact: expected_norm == actual_norm,
            lenient: abstracts_match(&case.expected, &actual),
            expected: case.expected.clone(),
            actual,
        };
        tracing::debug!(
            case = %result.label,
            exact = result.exact,
            distance = result.distance,
            "evaluated case"
        );
        progress(EvalProgress::CaseFinished {
            index,
            total,
            exact: result.exact,
        });
        cases.push(result);
    }

    let n = total as f64;
    EvaluationReport {
        accuracy: cases.iter().filter(|c| c.exact).count() as f64 / n,
        avg_distance: cases.iter().map(|c| c.distance).sum::<f64>() / n,
        lenient_accuracy: cases.iter().filter(|c| c.lenient).count() as f64 / n,
        cases,
    }
}
