//! Static page layout.

use serde::{Deserialize, Serialize};

/// Dimensions of the simulated editor page.
///
/// ```text
/// ┌────┬───────────────────────────────────────────┐
/// │    │ horizontal ruler                          │ ruler_thickness
/// ├────┼───────────────────────────────────────────┤
/// │ v  │         document_gap                      │
/// │ e  │      ┌──────────────────┐                 │
/// │ r  │      │ document (page)  │  centered       │
/// │ t  │      │                  │                 │
/// └────┴──────┴──────────────────┴─────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Window width.
    pub viewport_width: f64,
    /// Window height.
    pub viewport_height: f64,
    /// Height of the horizontal ruler and width of the vertical ruler.
    pub ruler_thickness: f64,
    /// Width of the document container.
    pub document_width: f64,
    /// Height of the document container.
    pub document_height: f64,
    /// Space between the top of the scroll container and the document.
    pub document_gap: f64,
    /// Whether the document renders a separate content box.
    pub has_content_box: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 900.0,
            ruler_thickness: 24.0,
            document_width: 816.0,
            document_height: 1056.0,
            document_gap: 48.0,
            has_content_box: true,
        }
    }
}

impl PageLayout {
    /// Width of the scroll container (viewport minus the vertical ruler).
    pub fn container_width(&self) -> f64 {
        (self.viewport_width - self.ruler_thickness).max(0.0)
    }

    /// Height of the scroll container (viewport minus the horizontal ruler).
    pub fn container_height(&self) -> f64 {
        (self.viewport_height - self.ruler_thickness).max(0.0)
    }

    /// Left edge of the document, relative to the scroll container.
    pub fn document_inset(&self) -> f64 {
        ((self.container_width() - self.document_width) / 2.0).max(0.0)
    }

    /// Largest scroll position (the document plus a gap below it).
    pub fn max_scroll_top(&self) -> f64 {
        let content_height = self.document_gap * 2.0 + self.document_height;
        (content_height - self.container_height()).max(0.0)
    }
}
