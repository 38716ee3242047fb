//! Paragraph indent ruler.
//!
//! A richer ruler that controls both the page-level left/right margins and per-paragraph
//! indentation (left, first-line, right) of the paragraph under the selection anchor. It is
//! paired with a [`TopMarginRuler`] on the side of the page.
//!
//! Unlike the page rulers, every marker here moves by pointer delta from where the drag started.
//! Page-margin markers write padding to the surface and are never persisted; paragraph markers
//! write through [`IndentHost`], which upgrades a plain paragraph on the first write.
//!
//! ```text
//!  0      margin_left                                  width - margin_right    width
//!  |########|---v first_line -----------------------------------v right|##########|
//!           |---^ left
//! ```

use serde::{Deserialize, Serialize};

use crate::config::RulerConfig;
use crate::drag::{DragState, PointerSample};
use crate::error::RulerError;
use crate::geometry::{Axis, leading_from_delta, trailing_from_delta};
use crate::indent::ParagraphIndent;
use crate::margins::MarginSide;
use crate::surface::{GeometryTrigger, IndentHost, IndentWrite, PageSurface};
use crate::ticks::{Tick, eighth_inch_ticks};

/// Eighth-inch ticks before the zero point of the horizontal indent ruler.
const HORIZONTAL_LEAD_TICKS: i32 = 12;
const HORIZONTAL_TICK_COUNT: usize = 100;
const VERTICAL_LEAD_TICKS: i32 = 4;
const VERTICAL_TICK_COUNT: usize = 120;

/// A draggable marker on the indent ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentMarker {
    /// Left page margin.
    MarginLeft,
    /// Right page margin.
    MarginRight,
    /// Paragraph left indent.
    Left,
    /// Paragraph first-line indent.
    FirstLine,
    /// Paragraph right indent.
    Right,
}

impl IndentMarker {
    /// Whether this marker edits the page margins rather than the paragraph.
    pub fn is_page_margin(self) -> bool {
        matches!(self, IndentMarker::MarginLeft | IndentMarker::MarginRight)
    }
}

/// What one pointer move on the indent ruler changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndentUpdate {
    /// A page margin; applied as padding, never persisted.
    PageMargin {
        /// `Left` or `Right`.
        side: MarginSide,
        /// New margin, clamped to the indent ruler bound.
        value: f64,
    },
    /// The paragraph under the selection anchor.
    Paragraph(ParagraphIndent),
}

/// Marker positions measured from the ruler's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndentMarkerLayout {
    /// End of the shaded left margin.
    pub margin_left: f64,
    /// Start of the shaded right margin.
    pub margin_right: f64,
    /// Left indent marker.
    pub left: f64,
    /// First-line marker.
    pub first_line: f64,
    /// Right indent marker.
    pub right: f64,
}

/// Horizontal indent ruler.
#[derive(Debug, Clone)]
pub struct IndentRuler {
    left_margin: f64,
    right_margin: f64,
    indent_left: f64,
    /// Absolute position of the first line (`indent_left + text_indent`).
    indent_first_line: f64,
    indent_right: f64,
    drag: DragState<IndentMarker>,
    margin_max: f64,
    dpi: f64,
}

/// Snapshot of every marker value, staged before a move is committed.
#[derive(Debug, Clone, Copy)]
struct Markers {
    left_margin: f64,
    right_margin: f64,
    indent_left: f64,
    indent_first_line: f64,
    indent_right: f64,
}

impl Markers {
    fn indent(&self) -> ParagraphIndent {
        ParagraphIndent::from_markers(self.indent_left, self.indent_first_line, self.indent_right)
    }
}

impl IndentRuler {
    /// Create a ruler with zero margins and indents.
    pub fn new(config: &RulerConfig) -> Self {
        Self {
            left_margin: 0.0,
            right_margin: 0.0,
            indent_left: 0.0,
            indent_first_line: 0.0,
            indent_right: 0.0,
            drag: DragState::Idle,
            margin_max: config.indent_margin_max,
            dpi: config.dpi,
        }
    }

    /// Left page margin.
    pub fn left_margin(&self) -> f64 {
        self.left_margin
    }

    /// Right page margin.
    pub fn right_margin(&self) -> f64 {
        self.right_margin
    }

    /// Paragraph indentation as the markers currently show it.
    pub fn indent(&self) -> ParagraphIndent {
        self.markers().indent()
    }

    /// Absolute first-line marker value.
    pub fn first_line(&self) -> f64 {
        self.indent_first_line
    }

    /// Current drag state.
    pub fn drag_state(&self) -> &DragState<IndentMarker> {
        &self.drag
    }

    /// Value the marker `kind` currently shows.
    pub fn value_of(&self, kind: IndentMarker) -> f64 {
        match kind {
            IndentMarker::MarginLeft => self.left_margin,
            IndentMarker::MarginRight => self.right_margin,
            IndentMarker::Left => self.indent_left,
            IndentMarker::FirstLine => self.indent_first_line,
            IndentMarker::Right => self.indent_right,
        }
    }

    /// Load the paragraph markers from the block under the selection anchor.
    ///
    /// Returns `false` (markers untouched) when there is no selection.
    pub fn sync_from_selection<H>(&mut self, host: &H) -> bool
    where
        H: IndentHost + ?Sized,
    {
        let Some(indent) = host.active_paragraph_indent() else {
            return false;
        };
        self.indent_left = indent.padding_left;
        self.indent_first_line = indent.first_line_position();
        self.indent_right = indent.padding_right;
        true
    }

    /// Pointer-down on `kind`; records the pointer X and the marker's value.
    pub fn pointer_down(
        &mut self,
        kind: IndentMarker,
        pointer: PointerSample,
    ) -> Result<(), RulerError> {
        let value = self.value_of(kind);
        self.drag
            .begin(kind, pointer.pointer_id, pointer.client_x, value)?;
        Ok(())
    }

    /// Pointer-move while dragging.
    pub fn pointer_move(&mut self, pointer: PointerSample) -> Option<IndentUpdate> {
        let (update, markers) = self.next_markers(pointer)?;
        self.commit(markers);
        Some(update)
    }

    /// Marker values a pointer move would produce, without moving anything.
    fn next_markers(&self, pointer: PointerSample) -> Option<(IndentUpdate, Markers)> {
        let session = self.drag.session_for(pointer.pointer_id)?;
        let delta = session.delta(pointer.client_x);
        let anchor = session.anchor_value;
        let mut next = self.markers();

        let update = match session.kind {
            IndentMarker::MarginLeft => {
                next.left_margin = leading_from_delta(anchor, delta, self.margin_max);
                IndentUpdate::PageMargin {
                    side: MarginSide::Left,
                    value: next.left_margin,
                }
            }
            IndentMarker::MarginRight => {
                next.right_margin = trailing_from_delta(anchor, delta, self.margin_max);
                IndentUpdate::PageMargin {
                    side: MarginSide::Right,
                    value: next.right_margin,
                }
            }
            IndentMarker::Left => {
                let value = leading_from_delta(anchor, delta, f64::INFINITY);
                // The first line keeps its offset from the left indent.
                let offset = next.indent_first_line - next.indent_left;
                next.indent_left = value;
                next.indent_first_line = value + offset;
                IndentUpdate::Paragraph(next.indent())
            }
            IndentMarker::FirstLine => {
                next.indent_first_line = leading_from_delta(anchor, delta, f64::INFINITY);
                IndentUpdate::Paragraph(next.indent())
            }
            IndentMarker::Right => {
                next.indent_right = trailing_from_delta(anchor, delta, f64::INFINITY);
                IndentUpdate::Paragraph(next.indent())
            }
        };
        Some((update, next))
    }

    fn markers(&self) -> Markers {
        Markers {
            left_margin: self.left_margin,
            right_margin: self.right_margin,
            indent_left: self.indent_left,
            indent_first_line: self.indent_first_line,
            indent_right: self.indent_right,
        }
    }

    fn commit(&mut self, markers: Markers) {
        self.left_margin = markers.left_margin;
        self.right_margin = markers.right_margin;
        self.indent_left = markers.indent_left;
        self.indent_first_line = markers.indent_first_line;
        self.indent_right = markers.indent_right;
    }

    /// Pointer-up. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.drag.end(pointer.pointer_id).is_some()
    }

    /// Pointer capture was lost.
    pub fn lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.drag.release_capture(pointer.pointer_id).is_some()
    }

    /// Marker positions on a ruler `ruler_width` wide.
    pub fn marker_layout(&self, ruler_width: f64) -> IndentMarkerLayout {
        IndentMarkerLayout {
            margin_left: self.left_margin,
            margin_right: ruler_width - self.right_margin,
            left: self.left_margin + self.indent_left,
            first_line: self.left_margin + self.indent_first_line,
            right: ruler_width - (self.right_margin + self.indent_right),
        }
    }

    /// Eighth-inch ticks with zero at the left margin, clipped to the ruler.
    pub fn ticks(&self, ruler_width: f64) -> Vec<Tick> {
        eighth_inch_ticks(
            self.left_margin,
            HORIZONTAL_LEAD_TICKS,
            HORIZONTAL_TICK_COUNT,
            ruler_width,
            self.dpi,
        )
    }
}

/// Vertical ruler of the indent editor: the top page margin and a caret indicator.
#[derive(Debug, Clone)]
pub struct TopMarginRuler {
    top_margin: f64,
    indicator: Option<f64>,
    drag: DragState<MarginSide>,
    margin_max: f64,
    dpi: f64,
}

impl TopMarginRuler {
    /// Create a ruler showing the configured default top margin.
    pub fn new(config: &RulerConfig) -> Self {
        Self {
            top_margin: config.default_indent_top_margin,
            indicator: None,
            drag: DragState::Idle,
            margin_max: config.indent_margin_max,
            dpi: config.dpi,
        }
    }

    /// Top page margin.
    pub fn top_margin(&self) -> f64 {
        self.top_margin
    }

    /// Caret indicator, relative to the ruler's top edge.
    pub fn indicator(&self) -> Option<f64> {
        self.indicator
    }

    /// Current drag state.
    pub fn drag_state(&self) -> &DragState<MarginSide> {
        &self.drag
    }

    /// Read the top margin from the content box's padding. Unmounted surfaces keep the current
    /// value.
    pub fn sync_from_surface<S>(&mut self, surface: &S)
    where
        S: PageSurface + ?Sized,
    {
        if let Some(measurement) = surface.measure_surface() {
            self.top_margin = measurement.content_padding.top;
        }
    }

    /// Move the caret indicator.
    ///
    /// A caret outside the ruler leaves the indicator where it was; no caret hides it. Nothing
    /// changes while the ruler is not mounted.
    pub fn update_indicator<S>(&mut self, surface: &S)
    where
        S: PageSurface + ?Sized,
    {
        let Some(ruler) = surface.ruler_bounds(Axis::Vertical) else {
            return;
        };
        match surface.caret_bounds() {
            Some(caret) => {
                let relative_top = caret.top() - ruler.top();
                if (0.0..=ruler.height).contains(&relative_top) {
                    self.indicator = Some(relative_top);
                }
            }
            None => self.indicator = None,
        }
    }

    /// Pointer-down anywhere on the ruler.
    pub fn pointer_down(&mut self, pointer: PointerSample) -> Result<(), RulerError> {
        self.drag.begin(
            MarginSide::Top,
            pointer.pointer_id,
            pointer.client_y,
            self.top_margin,
        )?;
        Ok(())
    }

    /// Pointer-move while dragging. Returns the new top margin.
    pub fn pointer_move(&mut self, pointer: PointerSample) -> Option<f64> {
        let session = self.drag.session_for(pointer.pointer_id)?;
        self.top_margin = leading_from_delta(
            session.anchor_value,
            session.delta(pointer.client_y),
            self.margin_max,
        );
        Some(self.top_margin)
    }

    /// Pointer-up. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.drag.end(pointer.pointer_id).is_some()
    }

    /// Pointer capture was lost. The top margin keeps its last dragged value.
    pub fn lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.drag.release_capture(pointer.pointer_id).is_some()
    }

    /// Eighth-inch ticks with zero at the top margin, clipped to the ruler.
    pub fn ticks(&self, ruler_height: f64) -> Vec<Tick> {
        eighth_inch_ticks(
            self.top_margin,
            VERTICAL_LEAD_TICKS,
            VERTICAL_TICK_COUNT,
            ruler_height,
            self.dpi,
        )
    }
}

/// The paragraph-indent editor: both rulers, the page surface and the document host.
pub struct IndentEditor<S, H> {
    surface: S,
    host: H,
    ruler: IndentRuler,
    top: TopMarginRuler,
}

impl<S: PageSurface, H: IndentHost> IndentEditor<S, H> {
    /// Mount the editor and load the initial marker values.
    pub fn new(surface: S, host: H, config: &RulerConfig) -> Self {
        let mut ruler = IndentRuler::new(config);
        let mut top = TopMarginRuler::new(config);
        top.sync_from_surface(&surface);
        top.update_indicator(&surface);
        ruler.sync_from_selection(&host);
        Self {
            surface,
            host,
            ruler,
            top,
        }
    }

    /// The page surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable page surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The document host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable document host. Call [`IndentEditor::selection_changed`] after moving the
    /// selection.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Horizontal indent ruler.
    pub fn ruler(&self) -> &IndentRuler {
        &self.ruler
    }

    /// Vertical top-margin ruler.
    pub fn top_ruler(&self) -> &TopMarginRuler {
        &self.top
    }

    /// The selection moved.
    pub fn selection_changed(&mut self) {
        self.ruler.sync_from_selection(&self.host);
        self.top.update_indicator(&self.surface);
    }

    /// Scroll, resize or document updates move the caret indicator. The first layout pass also
    /// reads the top margin back from the content box.
    pub fn handle_geometry_event(&mut self, trigger: GeometryTrigger) {
        tracing::trace!(?trigger, "indent editor layout changed");
        if trigger == GeometryTrigger::Attached {
            self.top.sync_from_surface(&self.surface);
        }
        self.top.update_indicator(&self.surface);
    }

    /// Pointer-down on a horizontal marker.
    pub fn pointer_down(
        &mut self,
        kind: IndentMarker,
        pointer: PointerSample,
    ) -> Result<(), RulerError> {
        self.ruler.pointer_down(kind, pointer)
    }

    /// Pointer-move on the horizontal ruler; applies the update immediately.
    ///
    /// The markers only move once the surface or host has taken the new value, so a failed
    /// paragraph write leaves the ruler showing what the document holds.
    pub fn pointer_move(
        &mut self,
        pointer: PointerSample,
    ) -> Result<Option<IndentUpdate>, RulerError> {
        let Some((update, markers)) = self.ruler.next_markers(pointer) else {
            return Ok(None);
        };
        match update {
            IndentUpdate::PageMargin { side, value } => self.surface.apply_margin(side, value),
            IndentUpdate::Paragraph(indent) => {
                let write = self.host.write_active_paragraph_indent(indent)?;
                if write == IndentWrite::Upgraded {
                    tracing::debug!(?indent, "paragraph upgraded for indentation");
                } else if !write.is_applied() {
                    tracing::trace!(?write, "indent not applied");
                }
            }
        }
        self.ruler.commit(markers);
        Ok(Some(update))
    }

    /// Pointer-up on the horizontal ruler.
    pub fn pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.ruler.pointer_up(pointer)
    }

    /// Pointer capture on the horizontal ruler was lost.
    pub fn lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.ruler.lost_pointer_capture(pointer)
    }

    /// Pointer-down on the vertical ruler.
    pub fn top_pointer_down(&mut self, pointer: PointerSample) -> Result<(), RulerError> {
        self.top.pointer_down(pointer)
    }

    /// Pointer-move on the vertical ruler; applies the top margin as padding.
    pub fn top_pointer_move(&mut self, pointer: PointerSample) -> Option<f64> {
        let value = self.top.pointer_move(pointer)?;
        self.surface.apply_margin(MarginSide::Top, value);
        Some(value)
    }

    /// Pointer-up on the vertical ruler.
    pub fn top_pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.top.pointer_up(pointer)
    }

    /// Pointer capture on the vertical ruler was lost.
    pub fn top_lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.top.lost_pointer_capture(pointer)
    }

    /// Consume the editor.
    pub fn into_parts(self) -> (S, H) {
        (self.surface, self.host)
    }
}
