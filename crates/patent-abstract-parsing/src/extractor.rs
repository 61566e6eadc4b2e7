use std::path::Path;

use patent_abstract_core::{Extraction, NotFoundReason, PdfBackend, PdfDocument};

use crate::classify::{self, LineClassifier, LineRecord};
use crate::config::AbstractConfig;
use crate::heading::{self, ScannedText};
use crate::{join, section, text_processing, ParsingError};

/// A configurable abstract extraction pipeline.
///
/// Holds an [`AbstractConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`AbstractExtractor::with_config`] to supply custom patterns and thresholds.
#[derive(Debug, Clone)]
pub struct AbstractExtractor {
    config: AbstractConfig,
}

impl Default for AbstractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AbstractExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: AbstractConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: AbstractConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &AbstractConfig {
        &self.config
    }

    /// Read the leading pages, clipping page 1 to its abstract column when
    /// the heading sits on the right (step 1).
    pub fn scan_document(&self, doc: &dyn PdfDocument) -> ScannedText {
        heading::scan_document(doc, &self.config)
    }

    /// Slice the text after the first abstract heading (step 2).
    pub fn find_abstract_section<'a>(&self, text: &'a str) -> Option<&'a str> {
        section::find_abstract_section_with_config(text, &self.config)
    }

    /// Classify each line of the section, stopping at the first stop line (step 3).
    pub fn classify_lines(&self, section: &str) -> Vec<LineRecord> {
        LineClassifier::new(&self.config).classify_section(section)
    }

    /// The lines of the section that survive classification.
    pub fn collect_abstract_lines(&self, section: &str) -> Vec<String> {
        classify::kept_lines(&self.classify_lines(section))
    }

    /// Join kept lines, closing up split words (step 4).
    pub fn join_lines<S: AsRef<str>>(&self, lines: &[S]) -> String {
        join::join_lines_with_config(lines, &self.config)
    }

    /// Final cleanup of the joined text (step 5).
    pub fn normalize(&self, text: &str) -> String {
        text_processing::normalize_abstract(text)
    }

    /// Open `path` with `backend` and run the full pipeline.
    ///
    /// Only a document that cannot be opened is an error; every other failure
    /// is reported as [`Extraction::NotFound`].
    pub fn extract(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<Extraction, ParsingError> {
        let doc = backend.open(path)?;
        let extraction = self.extract_from_document(doc.as_ref());
        if let Extraction::NotFound(reason) = &extraction {
            tracing::debug!(path = %path.display(), %reason, "no abstract extracted");
        }
        Ok(extraction)
    }

    /// Run the pipeline on an already-opened document.
    pub fn extract_from_document(&self, doc: &dyn PdfDocument) -> Extraction {
        let scanned = self.scan_document(doc);
        self.extract_from_text(&scanned.text)
    }

    /// Run the pipeline on already-extracted text (no column clipping).
    pub fn extract_from_text(&self, text: &str) -> Extraction {
        let Some(section) = self.find_abstract_section(text) else {
            return Extraction::NotFound(NotFoundReason::HeadingNotFound);
        };
        tracing::debug!(offset = text.len() - section.len(), "abstract heading found");

        let records = self.classify_lines(section);
        let lines = classify::kept_lines(&records);
        tracing::debug!(classified = records.len(), kept = lines.len(), "lines classified");
        if lines.is_empty() {
            return Extraction::NotFound(NotFoundReason::NoSurvivingContent);
        }

        let abstract_text = self.normalize(&self.join_lines(&lines));
        if abstract_text.is_empty() {
            return Extraction::NotFound(NotFoundReason::EmptyAfterNormalization);
        }

        Extraction::Found(abstract_text)
    }
}
