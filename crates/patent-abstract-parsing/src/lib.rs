use std::path::Path;

use thiserror::Error;

pub mod classify;
pub mod config;
pub mod extractor;
pub mod heading;
pub mod join;
pub mod rules;
pub mod section;
pub mod text_processing;

pub use classify::{ContinuationState, LineClassifier, LineRecord, LineTag};
pub use config::{AbstractConfig, AbstractConfigBuilder, ConfigError, ListOverride};
pub use extractor::AbstractExtractor;
pub use heading::{ColumnLayout, ScannedText};
// Re-export domain types from core (canonical definitions live there)
pub use patent_abstract_core::{
    BackendError, Extraction, NotFoundReason, PageGeometry, PdfBackend, PdfDocument, Rect,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Extract the abstract from a patent PDF using the given backend.
///
/// Pipeline:
/// 1. Search page 1 for the heading and clip to its column if it sits right
/// 2. Read the first pages and slice after the abstract heading
/// 3. Classify lines (stop, noise, continuation markers) until a stop line
/// 4. Rejoin words split across line breaks
/// 5. Normalize into a single paragraph
pub fn extract_abstract(path: &Path, backend: &dyn PdfBackend) -> Result<Extraction, ParsingError> {
    AbstractExtractor::new().extract(path, backend)
}
