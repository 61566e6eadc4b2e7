use std::io::Write;

use owo_colors::OwoColorize;
use patent_abstract_eval::EvaluationReport;
use patent_abstract_parsing::{ColumnLayout, Extraction, LineRecord, LineTag};
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One entry of `extract --json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub file: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found: Option<String>,
}

impl FileRecord {
    pub fn from_extraction(file: &str, extraction: &Extraction) -> Self {
        match extraction {
            Extraction::Found(text) => Self {
                file: file.to_string(),
                abstract_text: Some(text.clone()),
                error: None,
                not_found: None,
            },
            Extraction::NotFound(reason) => Self {
                file: file.to_string(),
                abstract_text: None,
                error: None,
                not_found: Some(reason.to_string()),
            },
        }
    }

    pub fn from_error(file: &str, error: &dyn std::fmt::Display) -> Self {
        Self {
            file: file.to_string(),
            abstract_text: None,
            error: Some(error.to_string()),
            not_found: None,
        }
    }
}

/// Print one extracted abstract (or why none was found).
pub fn print_abstract(
    w: &mut dyn Write,
    file_name: &str,
    extraction: &Extraction,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", file_name.bold())?;
    } else {
        writeln!(w, "{}", file_name)?;
    }

    match extraction {
        Extraction::Found(text) => writeln!(w, "  {}", text)?,
        Extraction::NotFound(reason) => {
            let msg = format!("No abstract found ({})", reason);
            if color.enabled() {
                writeln!(w, "  {}", msg.yellow())?;
            } else {
                writeln!(w, "  {}", msg)?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print a document that could not be opened.
pub fn print_open_error(
    w: &mut dyn Write,
    file_name: &str,
    error: &dyn std::fmt::Display,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("Could not open {}: {}", file_name, error);
    if color.enabled() {
        writeln!(w, "{}", msg.red())?;
    } else {
        writeln!(w, "{}", msg)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the page-1 layout decision and every classified line with its tag.
pub fn print_explain(
    w: &mut dyn Write,
    layout: &ColumnLayout,
    records: Option<&[LineRecord]>,
    color: ColorMode,
) -> std::io::Result<()> {
    match layout {
        ColumnLayout::FullPage => writeln!(w, "  Layout:  full page")?,
        ColumnLayout::RightColumn { clip } => writeln!(
            w,
            "  Layout:  right column (x >= {:.1})",
            clip.x0
        )?,
    }

    let Some(records) = records else {
        writeln!(w, "  Heading: not found")?;
        return Ok(());
    };

    for record in records {
        let tag = match record.tag {
            LineTag::Keep => "KEEP",
            LineTag::Noise => "NOISE",
            LineTag::Stop => "STOP",
            LineTag::ContinuationMarker => "CONT",
            LineTag::Suppressed => "SKIP",
        };
        let rule = record.rule.map(|r| format!(" [{}]", r)).unwrap_or_default();
        let text = truncate(&record.text, 80);

        if color.enabled() {
            let tag = format!("{:<5}", tag);
            match record.tag {
                LineTag::Keep | LineTag::ContinuationMarker => {
                    writeln!(w, "  {} {}{}", tag.green(), text, rule.dimmed())?
                }
                LineTag::Stop => writeln!(w, "  {} {}{}", tag.red(), text, rule.dimmed())?,
                LineTag::Noise | LineTag::Suppressed => {
                    writeln!(w, "  {} {}{}", tag.dimmed(), text.dimmed(), rule.dimmed())?
                }
            }
        } else {
            writeln!(w, "  {:<5} {}{}", tag, text, rule)?;
        }
    }
    Ok(())
}

/// Print accuracy and average distance for an evaluation run.
pub fn print_evaluation_summary(
    w: &mut dyn Write,
    report: &EvaluationReport,
    color: ColorMode,
) -> std::io::Result<()> {
    let total = report.cases.len();
    let exact = report.cases.iter().filter(|c| c.exact).count();

    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "EVALUATION".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "EVALUATION")?;
        writeln!(w, "{}", sep)?;
    }

    writeln!(w, "  Cases: {}", total)?;
    let accuracy = format!(
        "Accuracy: {:.1}% ({}/{} exact)",
        report.accuracy * 100.0,
        exact,
        total
    );
    if color.enabled() {
        if exact == total {
            writeln!(w, "  {}", accuracy.green())?;
        } else {
            writeln!(w, "  {}", accuracy.yellow())?;
        }
    } else {
        writeln!(w, "  {}", accuracy)?;
    }
    writeln!(w, "  Lenient accuracy: {:.1}%", report.lenient_accuracy * 100.0)?;
    writeln!(w, "  Average distance: {:.4}", report.avg_distance)?;
    writeln!(w)?;
    Ok(())
}

/// Print each case without an exact match, expected text against actual.
pub fn print_failures(
    w: &mut dyn Write,
    report: &EvaluationReport,
    color: ColorMode,
) -> std::io::Result<()> {
    for case in report.failures() {
        let header = format!("{} (distance {:.3})", case.label, case.distance);
        if color.enabled() {
            writeln!(w, "{}", header.red().bold())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        writeln!(w, "  Expected: {}", truncate(&case.expected, 200))?;
        let actual = if case.actual.is_empty() {
            "(nothing extracted)".to_string()
        } else {
            truncate(&case.actual, 200)
        };
        if color.enabled() {
            writeln!(w, "  Actual:   {}", actual.dimmed())?;
        } else {
            writeln!(w, "  Actual:   {}", actual)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
