//! Ruler geometry: rectangles, clamping and the pointer-to-margin transforms.
//!
//! All values are CSS pixels. Pointer coordinates passed to the transforms are already relative
//! to the ruler's own bounding box (see [`HorizontalGeometry`] / [`VerticalGeometry`] for the
//! offsets they are compared against).

use serde::{Deserialize, Serialize};

use crate::surface::SurfaceMeasurement;

/// Width of a US-letter page at 96 DPI, used before the first measurement arrives.
pub const DEFAULT_DOCUMENT_WIDTH: f64 = 816.0;

/// An axis-aligned rectangle in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (never negative for measured elements).
    pub width: f64,
    /// Height (never negative for measured elements).
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same rectangle shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Ruler orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Runs along the top of the page; controls left/right.
    Horizontal,
    /// Runs along the side of the page; controls top/bottom.
    Vertical,
}

/// Clamp `value` into `[min, max]`.
///
/// Non-finite input (NaN, or an infinity produced by a bad measurement) maps to `min`, so no
/// reported value ever leaves its bound.
pub fn clamp_px(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}

/// Left margin for a pointer at `mouse_x` (ruler-relative).
pub fn left_margin_at(mouse_x: f64, text_start_offset: f64, max: f64) -> f64 {
    clamp_px(mouse_x - text_start_offset, 0.0, max)
}

/// Right margin for a pointer at `mouse_x`, measured back from the document's right edge.
pub fn right_margin_at(mouse_x: f64, document_offset: f64, document_width: f64, max: f64) -> f64 {
    clamp_px((document_offset + document_width) - mouse_x, 0.0, max)
}

/// Top margin for a pointer at `mouse_y` (ruler-relative, scroll-adjusted).
pub fn top_margin_at(mouse_y: f64, document_top_offset: f64, max: f64) -> f64 {
    clamp_px(mouse_y - document_top_offset, 0.0, max)
}

/// Bottom margin for a pointer at `mouse_y`, measured up from the document's bottom edge.
pub fn bottom_margin_at(
    mouse_y: f64,
    document_top_offset: f64,
    document_height: f64,
    max: f64,
) -> f64 {
    clamp_px((document_top_offset + document_height) - mouse_y, 0.0, max)
}

/// Value for a marker that grows with the pointer (`anchor + delta`).
///
/// Pass `f64::INFINITY` as `max` for kinds that are only bounded below.
pub fn leading_from_delta(anchor: f64, delta: f64, max: f64) -> f64 {
    clamp_px(anchor + delta, 0.0, max)
}

/// Value for a marker anchored to the far edge (`anchor - delta`).
pub fn trailing_from_delta(anchor: f64, delta: f64, max: f64) -> f64 {
    clamp_px(anchor - delta, 0.0, max)
}

/// Horizontal reference offsets, relative to the horizontal ruler's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalGeometry {
    /// Distance from the ruler's left edge to the document's left edge.
    pub document_offset: f64,
    /// Distance from the ruler's left edge to where text rendering begins.
    pub text_start_offset: f64,
    /// Rendered width of the document container.
    pub document_width: f64,
}

impl Default for HorizontalGeometry {
    fn default() -> Self {
        Self {
            document_offset: 0.0,
            text_start_offset: 0.0,
            document_width: DEFAULT_DOCUMENT_WIDTH,
        }
    }
}

impl HorizontalGeometry {
    /// Compute a fresh snapshot.
    ///
    /// `text_start_offset` comes from the content box when the host reports one and from the
    /// document box otherwise; there is no other fallback.
    /// Without a ruler rectangle or a measurement both offsets are 0 and the width keeps
    /// `fallback_width`.
    pub fn measure(
        ruler: Option<Rect>,
        measurement: Option<&SurfaceMeasurement>,
        fallback_width: f64,
    ) -> Self {
        let (Some(ruler), Some(m)) = (ruler, measurement) else {
            return Self {
                document_offset: 0.0,
                text_start_offset: 0.0,
                document_width: measurement.map_or(fallback_width, |m| m.document.width),
            };
        };

        let document_offset = m.document.left() - ruler.left();
        let text_start_offset = m
            .content
            .map_or(document_offset, |content| content.left() - ruler.left());

        Self {
            document_offset,
            text_start_offset,
            document_width: m.document.width,
        }
    }

    /// Right edge of the document, relative to the ruler.
    pub fn document_end(&self) -> f64 {
        self.document_offset + self.document_width
    }
}

/// Vertical reference offsets for the side ruler.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VerticalGeometry {
    /// Offset of the document's top edge within the scroll container's content.
    pub document_top_offset: f64,
    /// Rendered height of the document container.
    pub document_height: f64,
    /// Scroll position of the document scroll container.
    pub scroll_top: f64,
}

impl VerticalGeometry {
    /// Compute a fresh snapshot; missing inputs yield zeros.
    pub fn measure(ruler: Option<Rect>, measurement: Option<&SurfaceMeasurement>) -> Self {
        match (ruler, measurement) {
            (Some(_), Some(m)) => Self {
                document_top_offset: m.offset_top,
                document_height: m.document.height,
                scroll_top: m.scroll_top,
            },
            (None, Some(m)) => Self {
                document_top_offset: 0.0,
                document_height: m.document.height,
                scroll_top: m.scroll_top,
            },
            _ => Self::default(),
        }
    }

    /// Bottom edge of the document in scrolled content coordinates.
    pub fn document_end(&self) -> f64 {
        self.document_top_offset + self.document_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::EdgeInsets;

    fn measurement(document: Rect, content: Option<Rect>) -> SurfaceMeasurement {
        SurfaceMeasurement {
            document,
            content,
            offset_top: 48.0,
            scroll_top: 0.0,
            content_padding: EdgeInsets::default(),
        }
    }

    #[test]
    fn test_clamp_px_bounds_and_nan() {
        assert_eq!(clamp_px(-5.0, 0.0, 200.0), 0.0);
        assert_eq!(clamp_px(250.0, 0.0, 200.0), 200.0);
        assert_eq!(clamp_px(120.5, 0.0, 200.0), 120.5);
        assert_eq!(clamp_px(f64::NAN, 0.0, 200.0), 0.0);
        assert_eq!(clamp_px(1e9, 0.0, f64::INFINITY), 1e9);
        assert_eq!(clamp_px(f64::INFINITY, 0.0, 200.0), 0.0);
    }

    #[test]
    fn test_right_margin_from_document_end() {
        // 816px page at offset 0, pointer at 700 -> 116px right margin.
        assert_eq!(right_margin_at(700.0, 0.0, 816.0, 200.0), 116.0);
        // Far inside the page the value saturates at the bound.
        assert_eq!(right_margin_at(300.0, 0.0, 816.0, 200.0), 200.0);
        // Past the edge it floors at 0.
        assert_eq!(right_margin_at(900.0, 0.0, 816.0, 200.0), 0.0);
    }

    #[test]
    fn test_left_margin_relative_to_text_start() {
        assert_eq!(left_margin_at(150.0, 50.0, 200.0), 100.0);
        assert_eq!(left_margin_at(20.0, 50.0, 200.0), 0.0);
        assert_eq!(left_margin_at(400.0, 50.0, 200.0), 200.0);
    }

    #[test]
    fn test_vertical_transforms() {
        assert_eq!(top_margin_at(148.0, 48.0, 200.0), 100.0);
        assert_eq!(bottom_margin_at(1000.0, 48.0, 1056.0, 200.0), 104.0);
    }

    #[test]
    fn test_delta_transforms_are_sign_flipped() {
        assert_eq!(leading_from_delta(96.0, 10.0, 300.0), 106.0);
        assert_eq!(trailing_from_delta(96.0, 10.0, 300.0), 86.0);
        assert_eq!(trailing_from_delta(5.0, 10.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_horizontal_measure_uses_content_box() {
        let ruler = Rect::new(10.0, 0.0, 1200.0, 32.0);
        let m = measurement(
            Rect::new(202.0, 80.0, 816.0, 1056.0),
            Some(Rect::new(202.0, 80.0, 816.0, 1056.0)),
        );
        let g = HorizontalGeometry::measure(Some(ruler), Some(&m), DEFAULT_DOCUMENT_WIDTH);
        assert_eq!(g.document_offset, 192.0);
        assert_eq!(g.text_start_offset, 192.0);
        assert_eq!(g.document_width, 816.0);

        let without_content = measurement(Rect::new(110.0, 0.0, 700.0, 900.0), None);
        let g = HorizontalGeometry::measure(Some(ruler), Some(&without_content), 816.0);
        assert_eq!(g.text_start_offset, g.document_offset);
        assert_eq!(g.document_width, 700.0);
    }

    #[test]
    fn test_missing_anchors_degrade_to_zero() {
        let g = HorizontalGeometry::measure(None, None, DEFAULT_DOCUMENT_WIDTH);
        assert_eq!(g.document_offset, 0.0);
        assert_eq!(g.text_start_offset, 0.0);
        assert_eq!(g.document_width, DEFAULT_DOCUMENT_WIDTH);

        let v = VerticalGeometry::measure(Some(Rect::default()), None);
        assert_eq!(v, VerticalGeometry::default());
    }
}
