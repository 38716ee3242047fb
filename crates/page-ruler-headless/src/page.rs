//! The simulated page.
//!
//! Both queues are bounded. Pending triggers are coalesced, since every trigger runs an
//! idempotent refresh, and the style-write log keeps only the newest
//! [`MAX_RECORDED_MUTATIONS`] entries. Hosts should still drain both after each event.

use std::collections::VecDeque;

use page_ruler::{
    Axis, EdgeInsets, GeometryTrigger, InlineStyle, MarginSide, PageSurface, Rect,
    SurfaceMeasurement,
};
use serde::Serialize;

use crate::layout::PageLayout;

/// Style writes kept between two [`HeadlessPage::take_mutations`] calls; older ones are dropped.
pub const MAX_RECORDED_MUTATIONS: usize = 1024;

/// One inline-style write on the content box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleMutation {
    /// CSS property, e.g. `padding-left`.
    pub property: String,
    /// Serialized value, e.g. `96px`.
    pub value: String,
}

/// An in-memory page implementing [`PageSurface`].
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    layout: PageLayout,
    scroll_top: f64,
    attached: bool,
    content_style: InlineStyle,
    caret: Option<Rect>,
    mutations: VecDeque<StyleMutation>,
    triggers: Vec<GeometryTrigger>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new(PageLayout::default())
    }
}

impl HeadlessPage {
    /// A page that has not finished its first layout yet.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            scroll_top: 0.0,
            attached: false,
            content_style: InlineStyle::default(),
            caret: None,
            mutations: VecDeque::new(),
            triggers: Vec::new(),
        }
    }

    /// A page whose layout has already settled.
    pub fn attached(layout: PageLayout) -> Self {
        let mut page = Self::new(layout);
        page.attach();
        page
    }

    /// Current layout.
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Current scroll position of the scroll container.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Whether the document is mounted.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Inline style of the content box.
    pub fn content_style(&self) -> &InlineStyle {
        &self.content_style
    }

    /// Padding currently applied to the content box; unset sides are 0.
    pub fn content_padding(&self) -> EdgeInsets {
        let px = |side: MarginSide| self.content_style.get_px(side.padding_property()).unwrap_or(0.0);
        EdgeInsets {
            top: px(MarginSide::Top),
            right: px(MarginSide::Right),
            bottom: px(MarginSide::Bottom),
            left: px(MarginSide::Left),
        }
    }

    /// Mount the document (first layout pass).
    pub fn attach(&mut self) {
        self.attached = true;
        self.queue(GeometryTrigger::Attached);
    }

    /// Unmount the document. Measurements return `None` afterwards.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Resize the window.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.layout.viewport_width = viewport_width;
        self.layout.viewport_height = viewport_height;
        self.scroll_top = self.scroll_top.min(self.layout.max_scroll_top());
        tracing::trace!(viewport_width, viewport_height, "page resized");
        self.queue(GeometryTrigger::Resize);
    }

    /// Scroll the document container. The position is clamped to the scrollable range.
    pub fn scroll_to(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.clamp(0.0, self.layout.max_scroll_top());
        self.queue(GeometryTrigger::Scroll);
    }

    /// Move the caret. `top` is relative to the document's top edge.
    pub fn set_caret(&mut self, top: Option<f64>) {
        self.caret = top.map(|top| {
            let document = self.document_rect();
            Rect::new(document.left() + 96.0, document.top() + top, 1.0, 18.0)
        });
    }

    /// Replace the content box's whole inline style, as an external script would.
    pub fn set_content_style(&mut self, css: &str) {
        self.content_style = InlineStyle::parse(css);
        self.queue(GeometryTrigger::ContentMutation);
    }

    /// Drain the style writes since the last call, oldest first.
    ///
    /// At most [`MAX_RECORDED_MUTATIONS`] are returned; earlier writes were dropped.
    pub fn take_mutations(&mut self) -> Vec<StyleMutation> {
        std::mem::take(&mut self.mutations).into()
    }

    /// Drain the observer notifications since the last call.
    ///
    /// Each trigger appears once, in the order it was first raised.
    pub fn take_triggers(&mut self) -> Vec<GeometryTrigger> {
        std::mem::take(&mut self.triggers)
    }

    fn queue(&mut self, trigger: GeometryTrigger) {
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    fn record(&mut self, mutation: StyleMutation) {
        if self.mutations.len() == MAX_RECORDED_MUTATIONS {
            self.mutations.pop_front();
        }
        self.mutations.push_back(mutation);
    }

    /// Client rectangle of the horizontal ruler.
    pub fn horizontal_ruler_rect(&self) -> Rect {
        let t = self.layout.ruler_thickness;
        Rect::new(t, 0.0, self.layout.container_width(), t)
    }

    /// Client rectangle of the vertical ruler.
    pub fn vertical_ruler_rect(&self) -> Rect {
        let t = self.layout.ruler_thickness;
        Rect::new(0.0, t, t, self.layout.container_height())
    }

    /// Client rectangle of the document container.
    pub fn document_rect(&self) -> Rect {
        let t = self.layout.ruler_thickness;
        Rect::new(
            t + self.layout.document_inset(),
            t + self.layout.document_gap - self.scroll_top,
            self.layout.document_width,
            self.layout.document_height,
        )
    }

    /// Client X of a point `x` pixels from the document's left edge.
    pub fn client_x_at(&self, x: f64) -> f64 {
        self.document_rect().left() + x
    }

    /// Client Y of a point `y` pixels below the document's top edge.
    pub fn client_y_at(&self, y: f64) -> f64 {
        self.document_rect().top() + y
    }
}

impl PageSurface for HeadlessPage {
    fn ruler_bounds(&self, axis: Axis) -> Option<Rect> {
        Some(match axis {
            Axis::Horizontal => self.horizontal_ruler_rect(),
            Axis::Vertical => self.vertical_ruler_rect(),
        })
    }

    fn measure_surface(&self) -> Option<SurfaceMeasurement> {
        if !self.attached {
            return None;
        }
        let document = self.document_rect();
        Some(SurfaceMeasurement {
            document,
            content: self.layout.has_content_box.then_some(document),
            offset_top: self.layout.document_gap,
            scroll_top: self.scroll_top,
            content_padding: self.content_padding(),
        })
    }

    fn apply_margin(&mut self, side: MarginSide, value: f64) {
        let property = side.padding_property();
        self.content_style.set_px(property, value);
        let value = self.content_style.get(property).unwrap_or_default().to_string();
        self.record(StyleMutation {
            property: property.to_string(),
            value,
        });
        self.queue(GeometryTrigger::ContentMutation);
    }

    fn caret_bounds(&self) -> Option<Rect> {
        self.caret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unattached_page_has_no_measurement() {
        let mut page = HeadlessPage::default();
        assert!(page.measure_surface().is_none());
        page.attach();
        assert_eq!(page.take_triggers(), vec![GeometryTrigger::Attached]);
        assert!(page.measure_surface().is_some());
    }

    #[test]
    fn test_apply_margin_writes_inline_padding() {
        let mut page = HeadlessPage::attached(PageLayout::default());
        page.apply_margin(MarginSide::Left, 96.0);
        page.apply_margin(MarginSide::Top, 12.5);

        assert_eq!(page.content_style().to_css(), "padding-left: 96px; padding-top: 12.5px");
        assert_eq!(page.content_padding().left, 96.0);
        assert_eq!(
            page.take_mutations(),
            vec![
                StyleMutation {
                    property: "padding-left".into(),
                    value: "96px".into()
                },
                StyleMutation {
                    property: "padding-top".into(),
                    value: "12.5px".into()
                },
            ]
        );
        assert!(page.take_mutations().is_empty());
    }

    #[test]
    fn test_scroll_moves_document_and_clamps() {
        let mut page = HeadlessPage::attached(PageLayout::default());
        let top = page.document_rect().top();
        page.scroll_to(100.0);
        assert_eq!(page.document_rect().top(), top - 100.0);
        page.scroll_to(10_000.0);
        assert_eq!(page.scroll_top(), page.layout().max_scroll_top());
        page.scroll_to(-5.0);
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn test_content_box_is_optional() {
        let page = HeadlessPage::attached(PageLayout {
            has_content_box: false,
            ..PageLayout::default()
        });
        assert_eq!(page.measure_surface().unwrap().content, None);
    }

    #[test]
    fn test_pending_triggers_are_coalesced() {
        let mut page = HeadlessPage::attached(PageLayout::default());
        page.take_triggers();

        page.scroll_to(10.0);
        page.scroll_to(20.0);
        page.resize(1200.0, 800.0);
        page.scroll_to(30.0);
        page.apply_margin(MarginSide::Left, 10.0);
        page.apply_margin(MarginSide::Left, 20.0);
        assert_eq!(
            page.take_triggers(),
            vec![
                GeometryTrigger::Scroll,
                GeometryTrigger::Resize,
                GeometryTrigger::ContentMutation
            ]
        );
        assert!(page.take_triggers().is_empty());
    }

    #[test]
    fn test_mutation_log_keeps_newest_writes() {
        let mut page = HeadlessPage::attached(PageLayout::default());
        for value in 0..MAX_RECORDED_MUTATIONS + 10 {
            page.apply_margin(MarginSide::Top, value as f64);
        }

        let mutations = page.take_mutations();
        assert_eq!(mutations.len(), MAX_RECORDED_MUTATIONS);
        assert_eq!(mutations[0].value, "10px");
        assert_eq!(
            mutations.last().unwrap().value,
            format!("{}px", MAX_RECORDED_MUTATIONS + 9)
        );
        assert_eq!(page.content_padding().top, (MAX_RECORDED_MUTATIONS + 9) as f64);
    }
}
