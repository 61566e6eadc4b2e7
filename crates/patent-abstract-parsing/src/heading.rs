use patent_abstract_core::{PageGeometry, PdfDocument, Rect};

use crate::config::AbstractConfig;
use crate::text_processing::expand_ligatures;

/// Where page-1 text is read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnLayout {
    /// Heading in the left part of the page, or not located by the backend.
    FullPage,
    /// Heading far enough right that the abstract sits in a right-hand column.
    RightColumn { clip: Rect },
}

/// Text of the first pages, ready for slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedText {
    pub layout: ColumnLayout,
    pub text: String,
}

/// Decide the page-1 layout from the heading geometry.
///
/// A first hit starting beyond `column_threshold` of the page width means a
/// multi-column page: the clip runs from `column_margin` left of the hit
/// (never below 0) to the right edge, full height.
pub fn detect_layout(geometry: &PageGeometry, config: &AbstractConfig) -> ColumnLayout {
    let (Some(fraction), Some(hit)) = (geometry.first_hit_fraction(), geometry.hits.first())
    else {
        return ColumnLayout::FullPage;
    };

    if fraction <= config.column_threshold {
        return ColumnLayout::FullPage;
    }

    let bounds = geometry.bounds;
    ColumnLayout::RightColumn {
        clip: Rect::new(
            (hit.x0 - config.column_margin).max(0.0),
            bounds.y0,
            bounds.x1,
            bounds.y1,
        ),
    }
}

/// Read the first `max_pages` pages into one newline-terminated blob.
///
/// Page 1 is clipped to its abstract column when the heading geometry says
/// so; later pages are always read in full. Pages the backend fails to read
/// contribute nothing.
pub fn scan_document(doc: &dyn PdfDocument, config: &AbstractConfig) -> ScannedText {
    let page_count = doc.page_count().min(config.max_pages);
    if page_count == 0 {
        return ScannedText {
            layout: ColumnLayout::FullPage,
            text: String::new(),
        };
    }

    let layout = match doc.search_page(0, &config.search_term) {
        Ok(geometry) => detect_layout(&geometry, config),
        Err(e) => {
            tracing::debug!(error = %e, "heading search failed, using full page");
            ColumnLayout::FullPage
        }
    };
    tracing::debug!(?layout, pages = page_count, "scanning document");

    let first_clip = match layout {
        ColumnLayout::FullPage => None,
        ColumnLayout::RightColumn { clip } => Some(clip),
    };

    let mut text = String::new();
    for index in 0..page_count {
        let clip = if index == 0 { first_clip } else { None };
        match doc.page_text(index, clip) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => tracing::debug!(page = index, error = %e, "skipping unreadable page"),
        }
        text.push('\n');
    }

    if config.expand_ligatures {
        text = expand_ligatures(&text);
    }

    ScannedText { layout, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patent_abstract_core::{TextDocument, TextPage};

    fn geometry_with_hit(x0: f32) -> PageGeometry {
        PageGeometry {
            bounds: Rect::new(0.0, 0.0, 600.0, 800.0),
            hits: vec![Rect::new(x0, 100.0, x0 + 60.0, 112.0)],
        }
    }

    #[test]
    fn test_detect_layout_right_column() {
        let layout = detect_layout(&geometry_with_hit(420.0), &AbstractConfig::default());
        assert_eq!(
            layout,
            ColumnLayout::RightColumn {
                clip: Rect::new(220.0, 0.0, 600.0, 800.0)
            }
        );
    }

    #[test]
    fn test_detect_layout_left_heading_uses_full_page() {
        let layout = detect_layout(&geometry_with_hit(180.0), &AbstractConfig::default());
        assert_eq!(layout, ColumnLayout::FullPage);
    }

    #[test]
    fn test_detect_layout_threshold_is_exclusive() {
        // 330 / 600 = 0.55 exactly
        let layout = detect_layout(&geometry_with_hit(330.0), &AbstractConfig::default());
        assert_eq!(layout, ColumnLayout::FullPage);
    }

    #[test]
    fn test_detect_layout_clip_clamped_at_zero() {
        let config = crate::AbstractConfigBuilder::new()
            .column_margin(500.0)
            .build()
            .unwrap();
        match detect_layout(&geometry_with_hit(420.0), &config) {
            ColumnLayout::RightColumn { clip } => assert_eq!(clip.x0, 0.0),
            other => panic!("expected right column, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_layout_no_hits() {
        let geometry = PageGeometry {
            bounds: Rect::new(0.0, 0.0, 600.0, 800.0),
            hits: vec![],
        };
        assert_eq!(
            detect_layout(&geometry, &AbstractConfig::default()),
            ColumnLayout::FullPage
        );
    }

    #[test]
    fn test_scan_document_limits_pages() {
        let doc = TextDocument::from_page_texts(["one", "two", "three", "four"]);
        let scanned = scan_document(&doc, &AbstractConfig::default());
        assert_eq!(scanned.text, "one\n\ntwo\n\nthree\n\n");
        assert_eq!(scanned.layout, ColumnLayout::FullPage);
    }

    #[test]
    fn test_scan_document_clips_only_first_page() {
        let page1 = TextPage::new(600.0, 800.0)
            .with_line(40.0, 100.0, "(54) CHARGING DEVICE")
            .with_line(400.0, 100.0, "(57) ABSTRACT")
            .with_line(40.0, 112.0, "(75) Inventor: Someone")
            .with_line(400.0, 112.0, "The present invention provides");
        let page2 = TextPage::new(600.0, 800.0).with_line(40.0, 10.0, "left column page two");
        let doc = TextDocument::new(vec![page1, page2]);

        let scanned = scan_document(&doc, &AbstractConfig::default());
        assert!(matches!(scanned.layout, ColumnLayout::RightColumn { .. }));
        assert!(!scanned.text.contains("CHARGING DEVICE"));
        assert!(scanned.text.contains("The present invention provides"));
        assert!(scanned.text.contains("left column page two"));
    }

    #[test]
    fn test_scan_document_expands_ligatures() {
        let doc = TextDocument::from_page_texts(["ABSTRACT\nAn eﬃcient ﬁlter"]);
        let scanned = scan_document(&doc, &AbstractConfig::default());
        assert!(scanned.text.contains("An efficient filter"));
    }

    #[test]
    fn test_scan_document_keeps_ligatures_when_disabled() {
        let doc = TextDocument::from_page_texts(["ABSTRACT\nAn eﬃcient ﬁlter"]);
        let config = crate::config::AbstractConfigBuilder::new()
            .expand_ligatures(false)
            .build()
            .unwrap();
        let scanned = scan_document(&doc, &config);
        assert!(scanned.text.contains("An eﬃcient ﬁlter"));
    }

    #[test]
    fn test_scan_empty_document() {
        let doc = TextDocument::default();
        let scanned = scan_document(&doc, &AbstractConfig::default());
        assert!(scanned.text.is_empty());
    }
}
