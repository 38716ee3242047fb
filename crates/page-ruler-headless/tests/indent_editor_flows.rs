use page_ruler::{
    Block, Document, GeometryTrigger, IndentEditor, IndentHost, IndentMarker, IndentUpdate,
    MarginSide, PageSurface, ParagraphIndent, PointerSample, RulerConfig,
};
use page_ruler_headless::{HeadlessPage, PageLayout};
use pretty_assertions::assert_eq;

fn resume() -> (Document, Vec<page_ruler::NodeKey>) {
    let mut doc = Document::new();
    let keys = vec![
        doc.push_heading(1, "Jane Doe"),
        doc.push_paragraph("Experience"),
        doc.push_paragraph("Built a ruler"),
    ];
    (doc, keys)
}

#[test]
fn test_top_margin_reads_existing_padding() {
    let mut page = HeadlessPage::attached(PageLayout::default());
    page.apply_margin(MarginSide::Top, 72.0);
    page.take_mutations();

    let editor = IndentEditor::new(page, Document::new(), &RulerConfig::default());
    assert_eq!(editor.top_ruler().top_margin(), 72.0);
}

#[test]
fn test_top_margin_drag_is_capped_at_300() {
    let page = HeadlessPage::attached(PageLayout::default());
    let mut editor = IndentEditor::new(page, Document::new(), &RulerConfig::default());
    // Unset padding reads as 0 on a mounted page.
    assert_eq!(editor.top_ruler().top_margin(), 0.0);

    editor.top_pointer_down(PointerSample::at(4.0, 100.0)).unwrap();
    assert_eq!(editor.top_pointer_move(PointerSample::at(4.0, 140.0)), Some(40.0));
    assert_eq!(editor.top_pointer_move(PointerSample::at(4.0, 900.0)), Some(300.0));
    editor.top_pointer_up(PointerSample::at(4.0, 900.0));

    let mutations = editor.surface_mut().take_mutations();
    assert_eq!(mutations.last().unwrap().value, "300px");
}

#[test]
fn test_caret_indicator_follows_scroll() {
    let mut page = HeadlessPage::attached(PageLayout::default());
    page.set_caret(Some(200.0));
    let mut editor = IndentEditor::new(page, Document::new(), &RulerConfig::default());

    // Document top is 48px below the ruler's top edge.
    assert_eq!(editor.top_ruler().indicator(), Some(248.0));

    editor.surface_mut().scroll_to(100.0);
    editor.surface_mut().set_caret(Some(200.0));
    editor.handle_geometry_event(GeometryTrigger::Scroll);
    assert_eq!(editor.top_ruler().indicator(), Some(148.0));

    // Caret scrolled above the ruler: keep the last position.
    editor.surface_mut().scroll_to(276.0);
    editor.surface_mut().set_caret(Some(0.0));
    editor.handle_geometry_event(GeometryTrigger::Scroll);
    assert_eq!(editor.top_ruler().indicator(), Some(148.0));
}

#[test]
fn test_selection_sync_and_indent_drag() {
    let (mut doc, keys) = resume();
    doc.set_caret(keys[2], 0).unwrap();
    doc.write_active_paragraph_indent(ParagraphIndent::new(24.0, -12.0, 8.0))
        .unwrap();

    let page = HeadlessPage::attached(PageLayout::default());
    let mut editor = IndentEditor::new(page, doc, &RulerConfig::default());
    assert_eq!(editor.ruler().indent(), ParagraphIndent::new(24.0, -12.0, 8.0));
    assert_eq!(editor.ruler().first_line(), 12.0);

    editor
        .pointer_down(IndentMarker::Left, PointerSample::at(500.0, 10.0))
        .unwrap();
    let update = editor
        .pointer_move(PointerSample::at(510.0, 10.0))
        .unwrap()
        .unwrap();
    assert_eq!(
        update,
        IndentUpdate::Paragraph(ParagraphIndent::new(34.0, -12.0, 8.0))
    );
    editor.pointer_up(PointerSample::at(510.0, 10.0));
    assert_eq!(editor.ruler().first_line(), 22.0);

    // Moving the caret to a plain paragraph resets the markers.
    editor.host_mut().set_caret(keys[1], 0).unwrap();
    editor.selection_changed();
    assert_eq!(editor.ruler().indent(), ParagraphIndent::ZERO);

    let Some(Block::Paragraph(p)) = editor.host().block(keys[2]) else {
        panic!("paragraph expected");
    };
    assert_eq!(p.capability.indent(), ParagraphIndent::new(34.0, -12.0, 8.0));
}

#[test]
fn test_heading_keeps_markers_but_document_unchanged() {
    let (mut doc, keys) = resume();
    doc.set_caret(keys[0], 2).unwrap();
    let version = doc.version();

    let page = HeadlessPage::attached(PageLayout::default());
    let mut editor = IndentEditor::new(page, doc, &RulerConfig::default());
    editor
        .pointer_down(IndentMarker::Right, PointerSample::at(800.0, 10.0))
        .unwrap();
    editor.pointer_move(PointerSample::at(780.0, 10.0)).unwrap();

    assert_eq!(editor.ruler().indent().padding_right, 20.0);
    assert_eq!(editor.host().version(), version);
    assert!(matches!(editor.host().block(keys[0]), Some(Block::Heading(_))));
}

#[test]
fn test_margin_markers_write_root_padding_only() {
    let (mut doc, keys) = resume();
    doc.set_caret(keys[1], 0).unwrap();
    let page = HeadlessPage::attached(PageLayout::default());
    let mut editor = IndentEditor::new(page, doc, &RulerConfig::default());

    editor
        .pointer_down(IndentMarker::MarginRight, PointerSample::at(900.0, 10.0))
        .unwrap();
    editor.pointer_move(PointerSample::at(850.0, 10.0)).unwrap();
    editor.pointer_up(PointerSample::at(850.0, 10.0));

    assert_eq!(editor.ruler().right_margin(), 50.0);
    assert_eq!(editor.surface().content_padding().right, 50.0);
    assert_eq!(editor.host().block(keys[1]).unwrap().type_name(), "paragraph");
    assert_eq!(editor.ruler().marker_layout(1256.0).margin_right, 1206.0);
}
