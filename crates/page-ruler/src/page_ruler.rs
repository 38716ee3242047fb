//! Page margin rulers.
//!
//! [`HorizontalRuler`] drags the left/right page margins, [`VerticalRuler`] the top/bottom ones.
//! Neither ruler mutates the document: a pointer move yields a [`MarginUpdate`] (the
//! `onMarginChange(side, value)` notification) and the owner of the margins applies it.
//! [`PageEditor`] is that owner for a single page.
//!
//! # Example
//!
//! ```rust
//! use page_ruler::{
//!     Axis, EdgeInsets, GeometryTrigger, MarginSide, PageEditor, PageSurface, PointerSample,
//!     Rect, RulerConfig, SurfaceMeasurement,
//! };
//!
//! struct Page {
//!     padding: EdgeInsets,
//! }
//!
//! impl PageSurface for Page {
//!     fn ruler_bounds(&self, axis: Axis) -> Option<Rect> {
//!         Some(match axis {
//!             Axis::Horizontal => Rect::new(0.0, 0.0, 1000.0, 32.0),
//!             Axis::Vertical => Rect::new(0.0, 32.0, 24.0, 800.0),
//!         })
//!     }
//!
//!     fn measure_surface(&self) -> Option<SurfaceMeasurement> {
//!         let page = Rect::new(0.0, 80.0, 816.0, 1056.0);
//!         Some(SurfaceMeasurement {
//!             document: page,
//!             content: Some(page),
//!             offset_top: 48.0,
//!             scroll_top: 0.0,
//!             content_padding: self.padding,
//!         })
//!     }
//!
//!     fn apply_margin(&mut self, side: MarginSide, value: f64) {
//!         match side {
//!             MarginSide::Top => self.padding.top = value,
//!             MarginSide::Right => self.padding.right = value,
//!             MarginSide::Bottom => self.padding.bottom = value,
//!             MarginSide::Left => self.padding.left = value,
//!         }
//!     }
//! }
//!
//! let mut editor = PageEditor::new(Page { padding: EdgeInsets::default() }, &RulerConfig::default());
//! editor.handle_geometry_event(GeometryTrigger::Attached);
//!
//! editor
//!     .pointer_down(MarginSide::Right, PointerSample::at(720.0, 10.0))
//!     .unwrap();
//! editor.pointer_move(Axis::Horizontal, PointerSample::at(700.0, 10.0));
//! editor.pointer_up(Axis::Horizontal, PointerSample::at(700.0, 10.0));
//!
//! assert_eq!(editor.margins().right, 116.0);
//! assert_eq!(editor.surface().padding.right, 116.0);
//! ```

use serde::Serialize;

use crate::config::RulerConfig;
use crate::drag::{DragState, PointerSample};
use crate::error::RulerError;
use crate::geometry::{
    Axis, HorizontalGeometry, VerticalGeometry, bottom_margin_at, left_margin_at, right_margin_at,
    top_margin_at,
};
use crate::margins::{
    MarginChange, MarginChangeCallback, MarginController, MarginPreset, MarginSide, Margins,
};
use crate::surface::{GeometryTrigger, PageSurface};
use crate::ticks::{Tick, inch_marks};

/// `onMarginChange(side, value)`; `value` is already clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginUpdate {
    /// Side being dragged.
    pub side: MarginSide,
    /// New margin in px.
    pub value: f64,
}

/// Marker positions along a ruler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerPositions {
    /// Leading marker (left or top).
    pub leading: f64,
    /// Trailing marker (right or bottom).
    pub trailing: f64,
}

/// Horizontal page ruler (left and right margins).
#[derive(Debug, Clone)]
pub struct HorizontalRuler {
    geometry: HorizontalGeometry,
    drag: DragState<MarginSide>,
    measured: bool,
    max: f64,
    dpi: f64,
    inch_marks: usize,
    fallback_width: f64,
}

impl HorizontalRuler {
    /// Create an unmeasured ruler.
    pub fn new(config: &RulerConfig) -> Self {
        Self {
            geometry: HorizontalGeometry {
                document_width: config.default_document_width,
                ..HorizontalGeometry::default()
            },
            drag: DragState::Idle,
            measured: false,
            max: config.page_margin_max,
            dpi: config.dpi,
            inch_marks: config.horizontal_inch_marks,
            fallback_width: config.default_document_width,
        }
    }

    /// Cached geometry.
    pub fn geometry(&self) -> HorizontalGeometry {
        self.geometry
    }

    /// Whether at least one refresh has run.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Current drag state.
    pub fn drag_state(&self) -> &DragState<MarginSide> {
        &self.drag
    }

    /// Re-measure from `surface`, overwriting the whole snapshot.
    pub fn refresh<S>(&mut self, surface: &S) -> HorizontalGeometry
    where
        S: PageSurface + ?Sized,
    {
        let measurement = surface.measure_surface();
        self.geometry = HorizontalGeometry::measure(
            surface.ruler_bounds(Axis::Horizontal),
            measurement.as_ref(),
            self.fallback_width,
        );
        self.measured = true;
        self.geometry
    }

    /// Any geometry trigger re-measures.
    pub fn handle_geometry_event<S>(&mut self, trigger: GeometryTrigger, surface: &S)
    where
        S: PageSurface + ?Sized,
    {
        let geometry = self.refresh(surface);
        tracing::trace!(
            ?trigger,
            document_offset = geometry.document_offset,
            text_start_offset = geometry.text_start_offset,
            document_width = geometry.document_width,
            "horizontal ruler measured"
        );
    }

    /// Pointer-down on the left or right marker.
    pub fn pointer_down(
        &mut self,
        side: MarginSide,
        pointer: PointerSample,
        margins: &Margins,
    ) -> Result<(), RulerError> {
        if !matches!(side, MarginSide::Left | MarginSide::Right) {
            return Err(RulerError::UnsupportedMarker(side.as_str()));
        }
        self.drag
            .begin(side, pointer.pointer_id, pointer.client_x, margins.get(side))?;
        Ok(())
    }

    /// Pointer-move while dragging. Returns the clamped margin for the dragged side.
    pub fn pointer_move<S>(&mut self, pointer: PointerSample, surface: &S) -> Option<MarginUpdate>
    where
        S: PageSurface + ?Sized,
    {
        let session = self.drag.session_for(pointer.pointer_id)?;
        let ruler = surface.ruler_bounds(Axis::Horizontal)?;
        let mouse_x = pointer.client_x - ruler.left();

        let value = match session.kind {
            MarginSide::Left => left_margin_at(mouse_x, self.geometry.text_start_offset, self.max),
            MarginSide::Right => right_margin_at(
                mouse_x,
                self.geometry.document_offset,
                self.geometry.document_width,
                self.max,
            ),
            MarginSide::Top | MarginSide::Bottom => return None,
        };
        Some(MarginUpdate {
            side: session.kind,
            value,
        })
    }

    /// Pointer-up. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.drag.end(pointer.pointer_id).is_some()
    }

    /// Pointer capture was lost.
    pub fn lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.drag.release_capture(pointer.pointer_id).is_some()
    }

    /// Left and right marker positions for `margins`.
    pub fn marker_positions(&self, margins: &Margins) -> MarkerPositions {
        MarkerPositions {
            leading: self.geometry.text_start_offset + margins.left,
            trailing: self.geometry.document_end() - margins.right,
        }
    }

    /// Inch marks aligned with the document's left edge.
    pub fn ticks(&self) -> Vec<Tick> {
        inch_marks(self.geometry.document_offset, self.inch_marks, self.dpi)
    }
}

/// Vertical page ruler (top and bottom margins).
///
/// The ruler's internal scroll position mirrors the document scroll container so the inch marks
/// stay aligned while the document scrolls.
#[derive(Debug, Clone)]
pub struct VerticalRuler {
    geometry: VerticalGeometry,
    drag: DragState<MarginSide>,
    measured: bool,
    max: f64,
    dpi: f64,
    inch_marks: usize,
}

impl VerticalRuler {
    /// Create an unmeasured ruler.
    pub fn new(config: &RulerConfig) -> Self {
        Self {
            geometry: VerticalGeometry::default(),
            drag: DragState::Idle,
            measured: false,
            max: config.page_margin_max,
            dpi: config.dpi,
            inch_marks: config.vertical_inch_marks,
        }
    }

    /// Cached geometry.
    pub fn geometry(&self) -> VerticalGeometry {
        self.geometry
    }

    /// Whether at least one refresh has run.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Current drag state.
    pub fn drag_state(&self) -> &DragState<MarginSide> {
        &self.drag
    }

    /// Scroll position the ruler strip should be scrolled to.
    pub fn ruler_scroll_top(&self) -> f64 {
        self.geometry.scroll_top
    }

    /// Re-measure from `surface`, overwriting the whole snapshot.
    pub fn refresh<S>(&mut self, surface: &S) -> VerticalGeometry
    where
        S: PageSurface + ?Sized,
    {
        let measurement = surface.measure_surface();
        self.geometry =
            VerticalGeometry::measure(surface.ruler_bounds(Axis::Vertical), measurement.as_ref());
        self.measured = true;
        self.geometry
    }

    /// Any geometry trigger re-measures; a scroll also moves the ruler strip.
    pub fn handle_geometry_event<S>(&mut self, trigger: GeometryTrigger, surface: &S)
    where
        S: PageSurface + ?Sized,
    {
        let geometry = self.refresh(surface);
        tracing::trace!(
            ?trigger,
            document_top_offset = geometry.document_top_offset,
            document_height = geometry.document_height,
            scroll_top = geometry.scroll_top,
            "vertical ruler measured"
        );
    }

    /// Pointer-down on the top or bottom marker.
    pub fn pointer_down(
        &mut self,
        side: MarginSide,
        pointer: PointerSample,
        margins: &Margins,
    ) -> Result<(), RulerError> {
        if !matches!(side, MarginSide::Top | MarginSide::Bottom) {
            return Err(RulerError::UnsupportedMarker(side.as_str()));
        }
        self.drag
            .begin(side, pointer.pointer_id, pointer.client_y, margins.get(side))?;
        Ok(())
    }

    /// Pointer-move while dragging.
    ///
    /// The pointer is converted to scrolled content coordinates with the scroll position read at
    /// the time of the move.
    pub fn pointer_move<S>(&mut self, pointer: PointerSample, surface: &S) -> Option<MarginUpdate>
    where
        S: PageSurface + ?Sized,
    {
        let session = self.drag.session_for(pointer.pointer_id)?;
        let ruler = surface.ruler_bounds(Axis::Vertical)?;
        let scroll_top = surface
            .measure_surface()
            .map_or(self.geometry.scroll_top, |m| m.scroll_top);
        let mouse_y = pointer.client_y - ruler.top() + scroll_top;

        let value = match session.kind {
            MarginSide::Top => top_margin_at(mouse_y, self.geometry.document_top_offset, self.max),
            MarginSide::Bottom => bottom_margin_at(
                mouse_y,
                self.geometry.document_top_offset,
                self.geometry.document_height,
                self.max,
            ),
            MarginSide::Left | MarginSide::Right => return None,
        };
        Some(MarginUpdate {
            side: session.kind,
            value,
        })
    }

    /// Pointer-up. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self, pointer: PointerSample) -> bool {
        self.drag.end(pointer.pointer_id).is_some()
    }

    /// Pointer capture was lost.
    pub fn lost_pointer_capture(&mut self, pointer: PointerSample) -> bool {
        self.drag.release_capture(pointer.pointer_id).is_some()
    }

    /// Top and bottom marker positions for `margins`, in ruler content coordinates.
    pub fn marker_positions(&self, margins: &Margins) -> MarkerPositions {
        MarkerPositions {
            leading: self.geometry.document_top_offset + margins.top,
            trailing: self.geometry.document_end() - margins.bottom,
        }
    }

    /// Inch marks aligned with the document's top edge.
    pub fn ticks(&self) -> Vec<Tick> {
        inch_marks(self.geometry.document_top_offset, self.inch_marks, self.dpi)
    }
}

/// The editor container for one page: margins, both rulers and the page surface.
pub struct PageEditor<S> {
    surface: S,
    controller: MarginController,
    horizontal: HorizontalRuler,
    vertical: VerticalRuler,
}

impl<S: PageSurface> PageEditor<S> {
    /// Mount an editor on `surface` and apply the default margins as padding.
    ///
    /// The rulers stay unmeasured until the host reports [`GeometryTrigger::Attached`].
    pub fn new(mut surface: S, config: &RulerConfig) -> Self {
        let controller = MarginController::new(config.default_margins, config.page_margin_max);
        controller.apply_all(&mut surface);
        Self {
            surface,
            controller,
            horizontal: HorizontalRuler::new(config),
            vertical: VerticalRuler::new(config),
        }
    }

    /// The page surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable page surface (hosts use this to simulate layout changes).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current margins.
    pub fn margins(&self) -> Margins {
        self.controller.margins()
    }

    /// The margin owner.
    pub fn controller(&self) -> &MarginController {
        &self.controller
    }

    /// Horizontal ruler.
    pub fn horizontal(&self) -> &HorizontalRuler {
        &self.horizontal
    }

    /// Vertical ruler.
    pub fn vertical(&self) -> &VerticalRuler {
        &self.vertical
    }

    /// Subscribe to committed margin changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&MarginChange) + Send + 'static,
    {
        self.controller.subscribe(callback);
    }

    /// Subscribe with an already boxed callback.
    pub fn subscribe_boxed(&mut self, callback: MarginChangeCallback) {
        self.controller.subscribe(callback);
    }

    /// Forward a layout trigger to both rulers.
    pub fn handle_geometry_event(&mut self, trigger: GeometryTrigger) {
        self.horizontal
            .handle_geometry_event(trigger, &self.surface);
        self.vertical.handle_geometry_event(trigger, &self.surface);
    }

    /// Pointer-down on the marker for `side`.
    pub fn pointer_down(
        &mut self,
        side: MarginSide,
        pointer: PointerSample,
    ) -> Result<(), RulerError> {
        let margins = self.controller.margins();
        match side {
            MarginSide::Left | MarginSide::Right => {
                self.horizontal.pointer_down(side, pointer, &margins)
            }
            MarginSide::Top | MarginSide::Bottom => {
                self.vertical.pointer_down(side, pointer, &margins)
            }
        }
    }

    /// Pointer-move on `axis`; applies the margin change on every move.
    pub fn pointer_move(&mut self, axis: Axis, pointer: PointerSample) -> Option<MarginChange> {
        let update = match axis {
            Axis::Horizontal => self.horizontal.pointer_move(pointer, &self.surface),
            Axis::Vertical => self.vertical.pointer_move(pointer, &self.surface),
        }?;
        self.on_margin_change(update.side, update.value)
    }

    /// Pointer-up on `axis`.
    pub fn pointer_up(&mut self, axis: Axis, pointer: PointerSample) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal.pointer_up(pointer),
            Axis::Vertical => self.vertical.pointer_up(pointer),
        }
    }

    /// Pointer capture on `axis` was lost.
    pub fn lost_pointer_capture(&mut self, axis: Axis, pointer: PointerSample) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal.lost_pointer_capture(pointer),
            Axis::Vertical => self.vertical.lost_pointer_capture(pointer),
        }
    }

    /// `onMarginChange(side, value)`: clamp, store, apply as padding and re-measure.
    pub fn on_margin_change(&mut self, side: MarginSide, value: f64) -> Option<MarginChange> {
        let change = self
            .controller
            .handle_margin_change(&mut self.surface, side, value)?;
        self.handle_geometry_event(GeometryTrigger::ContentMutation);
        Some(change)
    }

    /// Apply a named preset.
    pub fn apply_preset(&mut self, preset: MarginPreset) -> Vec<MarginChange> {
        let changes = self.controller.set_preset(preset);
        self.apply_changes(&changes);
        changes
    }

    /// Apply manually typed text for `side`.
    pub fn set_manual_input(&mut self, side: MarginSide, input: &str) -> Option<MarginChange> {
        let change = self.controller.set_manual_input(side, input)?;
        self.apply_changes(&[change]);
        Some(change)
    }

    fn apply_changes(&mut self, changes: &[MarginChange]) {
        if changes.is_empty() {
            return;
        }
        for change in changes {
            self.surface.apply_margin(change.side, change.new);
        }
        self.handle_geometry_event(GeometryTrigger::ContentMutation);
    }

    /// Marker positions on the horizontal ruler.
    pub fn horizontal_markers(&self) -> MarkerPositions {
        self.horizontal.marker_positions(&self.controller.margins())
    }

    /// Marker positions on the vertical ruler.
    pub fn vertical_markers(&self) -> MarkerPositions {
        self.vertical.marker_positions(&self.controller.margins())
    }

    /// Consume the editor and return the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::surface::{EdgeInsets, SurfaceMeasurement};

    #[derive(Default)]
    struct FakePage {
        ruler: Option<Rect>,
        side_ruler: Option<Rect>,
        document: Option<Rect>,
        scroll_top: f64,
        padding: EdgeInsets,
    }

    impl PageSurface for FakePage {
        fn ruler_bounds(&self, axis: Axis) -> Option<Rect> {
            match axis {
                Axis::Horizontal => self.ruler,
                Axis::Vertical => self.side_ruler,
            }
        }

        fn measure_surface(&self) -> Option<SurfaceMeasurement> {
            let document = self.document?;
            Some(SurfaceMeasurement {
                document,
                content: Some(document),
                offset_top: 48.0,
                scroll_top: self.scroll_top,
                content_padding: self.padding,
            })
        }

        fn apply_margin(&mut self, side: MarginSide, value: f64) {
            match side {
                MarginSide::Top => self.padding.top = value,
                MarginSide::Right => self.padding.right = value,
                MarginSide::Bottom => self.padding.bottom = value,
                MarginSide::Left => self.padding.left = value,
            }
        }
    }

    fn letter_page() -> FakePage {
        FakePage {
            ruler: Some(Rect::new(0.0, 0.0, 816.0, 32.0)),
            side_ruler: Some(Rect::new(0.0, 40.0, 24.0, 700.0)),
            document: Some(Rect::new(0.0, 88.0, 816.0, 1056.0)),
            ..FakePage::default()
        }
    }

    #[test]
    fn test_right_marker_drag_matches_document_end() {
        let page = letter_page();
        let mut ruler = HorizontalRuler::new(&RulerConfig::default());
        ruler.handle_geometry_event(GeometryTrigger::Attached, &page);

        ruler
            .pointer_down(MarginSide::Right, PointerSample::at(720.0, 5.0), &Margins::default())
            .unwrap();
        let update = ruler.pointer_move(PointerSample::at(700.0, 5.0), &page).unwrap();
        assert_eq!(
            update,
            MarginUpdate {
                side: MarginSide::Right,
                value: 116.0
            }
        );

        let update = ruler.pointer_move(PointerSample::at(100.0, 5.0), &page).unwrap();
        assert_eq!(update.value, 200.0);
        assert!(ruler.pointer_up(PointerSample::at(100.0, 5.0)));
        assert!(ruler.pointer_move(PointerSample::at(90.0, 5.0), &page).is_none());
    }

    #[test]
    fn test_vertical_drag_accounts_for_scroll() {
        let mut page = letter_page();
        page.scroll_top = 100.0;
        let mut ruler = VerticalRuler::new(&RulerConfig::default());
        ruler.handle_geometry_event(GeometryTrigger::Scroll, &page);
        assert_eq!(ruler.ruler_scroll_top(), 100.0);

        ruler
            .pointer_down(MarginSide::Top, PointerSample::at(5.0, 100.0), &Margins::default())
            .unwrap();
        // client_y 100 - ruler top 40 + scroll 100 = 160; minus top offset 48 = 112.
        let update = ruler.pointer_move(PointerSample::at(5.0, 100.0), &page).unwrap();
        assert_eq!(update.value, 112.0);
    }

    #[test]
    fn test_unmounted_document_degrades_to_zero() {
        let page = FakePage::default();
        let mut ruler = HorizontalRuler::new(&RulerConfig::default());
        ruler.handle_geometry_event(GeometryTrigger::Attached, &page);
        assert_eq!(ruler.geometry().document_offset, 0.0);
        assert_eq!(ruler.geometry().text_start_offset, 0.0);

        ruler
            .pointer_down(MarginSide::Left, PointerSample::at(10.0, 0.0), &Margins::default())
            .unwrap();
        // No ruler rectangle: the move is ignored instead of failing.
        assert!(ruler.pointer_move(PointerSample::at(50.0, 0.0), &page).is_none());
    }

    #[test]
    fn test_wrong_axis_marker_is_rejected() {
        let mut ruler = HorizontalRuler::new(&RulerConfig::default());
        let err = ruler
            .pointer_down(MarginSide::Top, PointerSample::at(0.0, 0.0), &Margins::default())
            .unwrap_err();
        assert_eq!(err, RulerError::UnsupportedMarker("top"));
    }

    #[test]
    fn test_editor_applies_padding_and_markers_follow() {
        let mut editor = PageEditor::new(letter_page(), &RulerConfig::default());
        assert_eq!(editor.surface().padding.left, 96.0);
        editor.handle_geometry_event(GeometryTrigger::Attached);

        editor
            .pointer_down(MarginSide::Left, PointerSample::at(96.0, 5.0))
            .unwrap();
        let change = editor
            .pointer_move(Axis::Horizontal, PointerSample::at(150.0, 5.0))
            .unwrap();
        assert_eq!(change.new, 150.0);
        assert_eq!(editor.surface().padding.left, 150.0);
        assert_eq!(editor.horizontal_markers().leading, 150.0);
        assert_eq!(editor.horizontal_markers().trailing, 816.0 - 96.0);

        // Same position again: callback fires but nothing changes.
        assert!(
            editor
                .pointer_move(Axis::Horizontal, PointerSample::at(150.0, 5.0))
                .is_none()
        );
    }
}
