use std::path::Path;

use mupdf::{Document, Page, Quad, TextPageFlags};

use patent_abstract_core::{BackendError, PageGeometry, PdfBackend, PdfDocument, Rect};

/// Upper bound on search hits collected per page.
const MAX_SEARCH_HITS: u32 = 32;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (AGPL-3.0) so that the heuristic pipeline does not transitively depend
/// on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        tracing::debug!(path = %path.display(), pages = page_count, "opened PDF");

        Ok(Box::new(MupdfDocument {
            document,
            page_count: usize::try_from(page_count).unwrap_or(0),
        }))
    }
}

/// An open MuPDF document. The underlying handle is freed on drop.
struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl MupdfDocument {
    fn load_page(&self, index: usize) -> Result<Page, BackendError> {
        if index >= self.page_count {
            return Err(BackendError::PageOutOfRange {
                index,
                count: self.page_count,
            });
        }
        self.document
            .load_page(index as i32)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize, clip: Option<Rect>) -> Result<String, BackendError> {
        let page = self.load_page(index)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        // With a clip, characters are kept by origin and lines left empty are
        // dropped.
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .filter(|c| {
                        clip.is_none_or(|r| {
                            let origin = c.origin();
                            r.contains(origin.x, origin.y)
                        })
                    })
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                if clip.is_some() && line_text.trim().is_empty() {
                    continue;
                }
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(page_text)
    }

    fn search_page(&self, index: usize, needle: &str) -> Result<PageGeometry, BackendError> {
        let page = self.load_page(index)?;
        let bounds = page
            .bounds()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let hits = page
            .search(needle, MAX_SEARCH_HITS)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        Ok(PageGeometry {
            bounds: Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1),
            hits: hits.iter().map(quad_to_rect).collect(),
        })
    }
}

fn quad_to_rect(quad: &Quad) -> Rect {
    Rect::new(
        quad.ul.x.min(quad.ll.x),
        quad.ul.y.min(quad.ur.y),
        quad.ur.x.max(quad.lr.x),
        quad.ll.y.max(quad.lr.y),
    )
}
