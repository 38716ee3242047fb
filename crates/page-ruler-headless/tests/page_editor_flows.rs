use std::sync::{Arc, Mutex};

use page_ruler::{
    Axis, GeometryTrigger, HorizontalGeometry, MarginPreset, MarginSide, Margins, PageEditor,
    PageSurface, PointerSample, RulerConfig, RulerError, VerticalGeometry,
};
use page_ruler_headless::{HeadlessPage, PageLayout, StyleMutation};
use pretty_assertions::assert_eq;

fn mounted_editor(layout: PageLayout) -> PageEditor<HeadlessPage> {
    let mut editor = PageEditor::new(HeadlessPage::new(layout), &RulerConfig::default());
    editor.surface_mut().attach();
    pump(&mut editor);
    editor.surface_mut().take_mutations();
    editor
}

/// Forward queued observer notifications, like the host's event loop would.
fn pump(editor: &mut PageEditor<HeadlessPage>) {
    for trigger in editor.surface_mut().take_triggers() {
        editor.handle_geometry_event(trigger);
    }
}

fn assert_snapshot_is_fresh(editor: &PageEditor<HeadlessPage>) {
    let page = editor.surface();
    let measurement = page.measure_surface();
    assert_eq!(
        editor.horizontal().geometry(),
        HorizontalGeometry::measure(
            page.ruler_bounds(Axis::Horizontal),
            measurement.as_ref(),
            816.0
        )
    );
    assert_eq!(
        editor.vertical().geometry(),
        VerticalGeometry::measure(page.ruler_bounds(Axis::Vertical), measurement.as_ref())
    );
}

#[test]
fn test_right_margin_on_unshifted_page() {
    // Window exactly as wide as the page plus the side ruler: no centering offset.
    let mut editor = mounted_editor(PageLayout {
        viewport_width: 816.0 + 24.0,
        ..PageLayout::default()
    });
    assert_eq!(editor.horizontal().geometry().document_offset, 0.0);

    let ruler_left = editor.surface().horizontal_ruler_rect().left();
    editor
        .pointer_down(MarginSide::Right, PointerSample::at(ruler_left + 720.0, 8.0))
        .unwrap();
    let change = editor
        .pointer_move(Axis::Horizontal, PointerSample::at(ruler_left + 700.0, 8.0))
        .unwrap();
    assert_eq!(change.new, 116.0);
    assert!(editor.pointer_up(Axis::Horizontal, PointerSample::at(ruler_left + 700.0, 8.0)));

    assert_eq!(
        editor.surface_mut().take_mutations(),
        vec![StyleMutation {
            property: "padding-right".into(),
            value: "116px".into(),
        }]
    );
}

#[test]
fn test_centered_page_uses_document_offset() {
    let mut editor = mounted_editor(PageLayout::default());
    assert_eq!(editor.horizontal().geometry().document_offset, 220.0);

    let x = editor.surface().client_x_at(700.0);
    editor
        .pointer_down(MarginSide::Right, PointerSample::at(x, 8.0))
        .unwrap();
    editor.pointer_move(Axis::Horizontal, PointerSample::at(x, 8.0));
    assert_eq!(editor.margins().right, 116.0);

    // Deep into the page the value saturates at 200.
    let x = editor.surface().client_x_at(100.0);
    editor.pointer_move(Axis::Horizontal, PointerSample::at(x, 8.0));
    assert_eq!(editor.margins().right, 200.0);
    assert_eq!(editor.surface().content_padding().right, 200.0);
}

#[test]
fn test_left_margin_follows_pointer_and_markers() {
    let mut editor = mounted_editor(PageLayout::default());
    let x = editor.surface().client_x_at(150.0);
    editor
        .pointer_down(MarginSide::Left, PointerSample::at(x, 8.0))
        .unwrap();
    editor.pointer_move(Axis::Horizontal, PointerSample::at(x, 8.0));
    editor.pointer_up(Axis::Horizontal, PointerSample::at(x, 8.0));

    assert_eq!(editor.margins().left, 150.0);
    let markers = editor.horizontal_markers();
    assert_eq!(markers.leading, 220.0 + 150.0);
    assert_eq!(markers.trailing, 220.0 + 816.0 - 96.0);
}

#[test]
fn test_vertical_drag_while_scrolled() {
    let mut editor = mounted_editor(PageLayout::default());
    editor.surface_mut().scroll_to(100.0);
    pump(&mut editor);
    assert_eq!(editor.vertical().ruler_scroll_top(), 100.0);

    let y = editor.surface().client_y_at(60.0);
    editor
        .pointer_down(MarginSide::Top, PointerSample::at(4.0, y))
        .unwrap();
    editor.pointer_move(Axis::Vertical, PointerSample::at(4.0, y));
    assert_eq!(editor.margins().top, 60.0);

    let y = editor.surface().client_y_at(1056.0 - 40.0);
    editor.pointer_up(Axis::Vertical, PointerSample::at(4.0, y));
    editor
        .pointer_down(MarginSide::Bottom, PointerSample::at(4.0, y))
        .unwrap();
    editor.pointer_move(Axis::Vertical, PointerSample::at(4.0, y));
    assert_eq!(editor.margins().bottom, 40.0);

    let markers = editor.vertical_markers();
    assert_eq!(markers.leading, 48.0 + 60.0);
    assert_eq!(markers.trailing, 48.0 + 1056.0 - 40.0);
}

#[test]
fn test_interleaved_triggers_never_leave_stale_geometry() {
    let mut editor = mounted_editor(PageLayout::default());

    editor.surface_mut().resize(1000.0, 700.0);
    pump(&mut editor);
    assert_snapshot_is_fresh(&editor);
    assert_eq!(editor.horizontal().geometry().document_offset, 80.0);

    editor.surface_mut().scroll_to(250.0);
    editor.surface_mut().resize(1400.0, 700.0);
    editor.surface_mut().set_content_style("padding-left: 12px");
    pump(&mut editor);
    assert_snapshot_is_fresh(&editor);

    editor.surface_mut().scroll_to(30.0);
    pump(&mut editor);
    assert_snapshot_is_fresh(&editor);
    assert_eq!(editor.vertical().ruler_scroll_top(), 30.0);
}

#[test]
fn test_unmounted_document_reads_zero_and_still_clamps() {
    let mut editor = PageEditor::new(HeadlessPage::default(), &RulerConfig::default());
    editor.handle_geometry_event(GeometryTrigger::Attached);
    assert_eq!(editor.horizontal().geometry().document_offset, 0.0);
    assert_eq!(editor.horizontal().geometry().text_start_offset, 0.0);
    assert_eq!(editor.vertical().geometry(), VerticalGeometry::default());

    editor
        .pointer_down(MarginSide::Left, PointerSample::at(24.0, 8.0))
        .unwrap();
    editor.pointer_move(Axis::Horizontal, PointerSample::at(5000.0, 8.0));
    assert_eq!(editor.margins().left, 200.0);
}

#[test]
fn test_detach_resets_offsets() {
    let mut editor = mounted_editor(PageLayout::default());
    assert_eq!(editor.horizontal().geometry().document_offset, 220.0);
    editor.surface_mut().detach();
    editor.handle_geometry_event(GeometryTrigger::Resize);
    assert_eq!(editor.horizontal().geometry().document_offset, 0.0);
    assert_eq!(editor.horizontal().geometry().document_width, 816.0);
}

#[test]
fn test_single_capture_per_ruler() {
    let mut editor = mounted_editor(PageLayout::default());
    editor
        .pointer_down(MarginSide::Left, PointerSample::at(300.0, 8.0))
        .unwrap();
    let err = editor
        .pointer_down(MarginSide::Right, PointerSample::at(900.0, 8.0).with_pointer(2))
        .unwrap_err();
    assert_eq!(
        err,
        RulerError::PointerAlreadyCaptured {
            active: 1,
            requested: 2
        }
    );

    // The other axis has its own capture.
    editor
        .pointer_down(MarginSide::Top, PointerSample::at(4.0, 100.0).with_pointer(2))
        .unwrap();

    // Moves from a foreign pointer are ignored.
    assert!(
        editor
            .pointer_move(Axis::Horizontal, PointerSample::at(400.0, 8.0).with_pointer(2))
            .is_none()
    );
    assert!(editor.lost_pointer_capture(Axis::Horizontal, PointerSample::at(0.0, 0.0)));
    assert!(!editor.horizontal().drag_state().is_dragging());
}

#[test]
fn test_presets_and_manual_entry_write_padding() {
    let mut editor = mounted_editor(PageLayout::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    editor.subscribe(move |change| sink.lock().unwrap().push((change.side, change.new)));

    let changes = editor.apply_preset(MarginPreset::Narrow);
    assert_eq!(changes.len(), 4);
    assert_eq!(editor.margins(), Margins::uniform(8.0));
    assert_eq!(editor.surface().content_padding().left, 8.0);

    editor.set_manual_input(MarginSide::Bottom, "not a number");
    assert_eq!(editor.margins().bottom, 0.0);
    assert_eq!(editor.surface().content_style().get("padding-bottom"), Some("0px"));

    editor.set_manual_input(MarginSide::Top, "480");
    assert_eq!(editor.margins().top, 200.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[4], (MarginSide::Bottom, 0.0));
    assert_eq!(seen[5], (MarginSide::Top, 200.0));
}

#[test]
fn test_default_margins_applied_on_mount() {
    let mut page = HeadlessPage::attached(PageLayout::default());
    page.take_mutations();
    let mut editor = PageEditor::new(page, &RulerConfig::default());
    let mutations = editor.surface_mut().take_mutations();
    assert_eq!(mutations.len(), 4);
    assert!(mutations.iter().all(|m| m.value == "96px"));
}
