//! Host capability interface.
//!
//! The kernel never performs global lookups for the document element. Instead a host hands the
//! rulers a [`PageSurface`] (layout reads + padding writes) and, for the paragraph ruler, an
//! [`IndentHost`] (document model reads + transactional writes).

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::geometry::{Axis, Rect};
use crate::indent::ParagraphIndent;
use crate::margins::MarginSide;

/// Padding on the four sides of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
}

/// One fresh layout read of the document surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMeasurement {
    /// Bounding client rectangle of the document container (the white page).
    pub document: Rect,
    /// Bounding client rectangle of the content box, if the host renders one.
    pub content: Option<Rect>,
    /// Offset of the document container's top edge inside its scroll container.
    pub offset_top: f64,
    /// Current scroll position of the document scroll container.
    pub scroll_top: f64,
    /// Inline padding currently applied to the content box.
    pub content_padding: EdgeInsets,
}

/// Events after which cached geometry must be re-measured.
///
/// All triggers run the same idempotent refresh. [`GeometryTrigger::Attached`] is the host's
/// post-layout notification for the first read (for example the initial resize-observer
/// callback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryTrigger {
    /// The ruler was attached and layout has settled.
    Attached,
    /// The window or a containing element was resized.
    Resize,
    /// The document scroll container scrolled.
    Scroll,
    /// The content box's inline style changed.
    ContentMutation,
}

/// Layout capabilities a page host provides to the rulers.
pub trait PageSurface {
    /// Measured bounding rectangle of the ruler widget on `axis`, if it is mounted.
    fn ruler_bounds(&self, axis: Axis) -> Option<Rect>;

    /// Measure the document surface, or `None` if the document is not mounted yet.
    fn measure_surface(&self) -> Option<SurfaceMeasurement>;

    /// Apply `value` (px) as padding on `side` of the content box.
    fn apply_margin(&mut self, side: MarginSide, value: f64);

    /// Bounding rectangle of the caret, if there is a selection.
    fn caret_bounds(&self) -> Option<Rect> {
        None
    }
}

/// Result of writing paragraph indentation through an [`IndentHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentWrite {
    /// The active paragraph already carried indent attributes and was updated.
    Updated,
    /// The active paragraph was plain; it was upgraded and then updated.
    Upgraded,
    /// The active block cannot carry paragraph indentation (a heading, for example).
    NotIndentable,
    /// There is no selection.
    NoSelection,
}

impl IndentWrite {
    /// Whether the document changed.
    pub fn is_applied(self) -> bool {
        matches!(self, IndentWrite::Updated | IndentWrite::Upgraded)
    }
}

/// Document-model capabilities the paragraph ruler needs.
pub trait IndentHost {
    /// Indentation of the top-level block under the selection anchor.
    ///
    /// Plain paragraphs report [`ParagraphIndent::ZERO`]; `None` means there is no selection.
    fn active_paragraph_indent(&self) -> Option<ParagraphIndent>;

    /// Write `indent` onto the block under the selection anchor.
    ///
    /// A plain paragraph is upgraded to the indent-capable variant in the same transaction as
    /// the write, preserving its key, children and formatting.
    fn write_active_paragraph_indent(
        &mut self,
        indent: ParagraphIndent,
    ) -> Result<IndentWrite, DocumentError>;
}
