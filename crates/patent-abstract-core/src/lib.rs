use std::fmt;

pub mod backend;
pub mod config_file;
pub mod memory;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use memory::{PositionedLine, TextBackend, TextDocument, TextPage};

/// An axis-aligned rectangle in page layout units (PDF points for MuPDF).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Whether the point lies inside the rectangle (left/top edges inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Layout information for one page: its bounds plus every rectangle where a
/// searched string was found.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub bounds: Rect,
    pub hits: Vec<Rect>,
}

impl PageGeometry {
    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    /// Horizontal start of the first hit as a fraction of page width.
    ///
    /// `None` when there are no hits or the page has no width.
    pub fn first_hit_fraction(&self) -> Option<f32> {
        let hit = self.hits.first()?;
        let width = self.width();
        if width <= 0.0 {
            return None;
        }
        Some((hit.x0 - self.bounds.x0) / width)
    }
}

/// Why no abstract was recovered from a document.
///
/// None of these are errors; they all collapse to "not found" for callers
/// that only care whether text came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No whole-word "ABSTRACT" in the scanned pages.
    HeadingNotFound,
    /// Every line after the heading was a stop, noise or suppressed line.
    NoSurvivingContent,
    /// Lines survived but normalized to an empty string.
    EmptyAfterNormalization,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundReason::HeadingNotFound => "no abstract heading",
            NotFoundReason::NoSurvivingContent => "no abstract lines survived filtering",
            NotFoundReason::EmptyAfterNormalization => "abstract empty after normalization",
        };
        f.write_str(s)
    }
}

/// Outcome of a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(String),
    NotFound(NotFoundReason),
}

impl Extraction {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Found(text) => Some(text),
            Extraction::NotFound(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Found(text) => Some(text),
            Extraction::NotFound(_) => None,
        }
    }
}
