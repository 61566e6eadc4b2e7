//! In-memory text layer.
//!
//! Serves documents whose text was already extracted elsewhere (for example
//! `pdftotext` output, where pages are separated by form feeds) and synthetic
//! pages built line by line with explicit positions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{BackendError, PageGeometry, PdfBackend, PdfDocument, Rect};

/// US Letter in PDF points.
pub const DEFAULT_PAGE_WIDTH: f32 = 612.0;
pub const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Vertical distance between lines laid out by [`TextPage::from_text`].
pub const LINE_HEIGHT: f32 = 12.0;

/// Horizontal advance assumed per character when placing search hits.
pub const GLYPH_ADVANCE: f32 = 5.0;

const PAGE_BREAK: char = '\u{000C}';

/// A line of text anchored at its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPage {
    bounds: Rect,
    lines: Vec<PositionedLine>,
}

impl TextPage {
    /// An empty page of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            lines: Vec::new(),
        }
    }

    /// A letter-size page with every line at the left margin, stacked top to bottom.
    pub fn from_text(text: &str) -> Self {
        let mut page = Self::new(DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT);
        for (i, line) in text.lines().enumerate() {
            page.lines.push(PositionedLine {
                x: 0.0,
                y: i as f32 * LINE_HEIGHT,
                text: line.to_string(),
            });
        }
        page
    }

    /// Add a line at an explicit position. Lines are emitted in insertion order.
    pub fn with_line(mut self, x: f32, y: f32, text: impl Into<String>) -> Self {
        self.lines.push(PositionedLine {
            x,
            y,
            text: text.into(),
        });
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn lines(&self) -> &[PositionedLine] {
        &self.lines
    }

    fn text(&self, clip: Option<Rect>) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if let Some(clip) = clip
                && !clip.contains(line.x, line.y)
            {
                continue;
            }
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }

    fn search(&self, needle: &str) -> Vec<Rect> {
        let needle_lower = needle.to_lowercase();
        if needle_lower.is_empty() {
            return Vec::new();
        }
        let needle_chars = needle_lower.chars().count() as f32;

        let mut hits = Vec::new();
        for line in &self.lines {
            let haystack = line.text.to_lowercase();
            for (byte_offset, _) in haystack.match_indices(&needle_lower) {
                let char_offset = haystack[..byte_offset].chars().count() as f32;
                let x0 = line.x + char_offset * GLYPH_ADVANCE;
                hits.push(Rect::new(
                    x0,
                    line.y,
                    x0 + needle_chars * GLYPH_ADVANCE,
                    line.y + LINE_HEIGHT,
                ));
            }
        }
        hits
    }
}

/// A document held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDocument {
    pages: Vec<TextPage>,
}

impl TextDocument {
    pub fn new(pages: Vec<TextPage>) -> Self {
        Self { pages }
    }

    /// One letter-size page per string.
    pub fn from_page_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pages: texts
                .into_iter()
                .map(|t| TextPage::from_text(t.as_ref()))
                .collect(),
        }
    }

    /// Split text on form feeds, the page separator `pdftotext` emits.
    ///
    /// A trailing form feed does not produce an extra empty page.
    pub fn from_form_feed_text(text: &str) -> Self {
        let body = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
        Self::from_page_texts(body.split(PAGE_BREAK))
    }

    pub fn pages(&self) -> &[TextPage] {
        &self.pages
    }

    fn page(&self, index: usize) -> Result<&TextPage, BackendError> {
        self.pages.get(index).ok_or(BackendError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }
}

impl PdfDocument for TextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize, clip: Option<Rect>) -> Result<String, BackendError> {
        Ok(self.page(index)?.text(clip))
    }

    fn search_page(&self, index: usize, needle: &str) -> Result<PageGeometry, BackendError> {
        let page = self.page(index)?;
        Ok(PageGeometry {
            bounds: page.bounds(),
            hits: page.search(needle),
        })
    }
}

/// Backend over pre-extracted text.
///
/// Registered documents are served by path; any other path is read from disk
/// as UTF-8 text with form-feed page breaks.
#[derive(Debug, Clone, Default)]
pub struct TextBackend {
    documents: HashMap<PathBuf, TextDocument>,
}

impl TextBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, document: TextDocument) -> Self {
        self.documents.insert(path.into(), document);
        self
    }
}

impl PdfBackend for TextBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        if let Some(document) = self.documents.get(path) {
            return Ok(Box::new(document.clone()));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| BackendError::OpenError(format!("{}: {}", path.display(), e)))?;
        let document = TextDocument::from_form_feed_text(&text);
        tracing::debug!(
            path = %path.display(),
            pages = document.page_count(),
            "opened text document"
        );
        Ok(Box::new(document))
    }
}
