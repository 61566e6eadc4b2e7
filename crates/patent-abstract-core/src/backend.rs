use std::path::Path;

use thiserror::Error;

use crate::{PageGeometry, Rect};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An opened document that can hand out per-page text and search geometry.
///
/// The handle is released when dropped, so callers scope it to a single
/// extraction.
pub trait PdfDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of a page (0-based), one line per text line.
    ///
    /// With `clip`, only text whose origin lies inside the rectangle is returned.
    fn page_text(&self, index: usize, clip: Option<Rect>) -> Result<String, BackendError>;

    /// Search a page for `needle` (case-insensitive) and return the page
    /// bounds together with every hit rectangle.
    fn search_page(&self, index: usize, needle: &str) -> Result<PageGeometry, BackendError>;
}

/// Trait for document text-layer backends.
///
/// Implementors only open documents; the heuristic pipeline (heading lookup,
/// line classification, joining, normalization) lives in
/// `patent_abstract_parsing::AbstractExtractor`.
pub trait PdfBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}
