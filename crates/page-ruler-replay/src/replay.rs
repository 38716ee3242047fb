//! Scenario execution.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use page_ruler::{
    Axis, Document, HorizontalGeometry, IndentEditor, IndentMarkerLayout, MarginPreset, MarginSide,
    Margins, MarkerPositions, PageEditor, ParagraphIndent, PointerSample, RulerConfig,
    VerticalGeometry, format,
};
use page_ruler_headless::{HeadlessPage, StyleMutation};
use serde::Serialize;

use crate::scenario::{Mode, Scenario, Step};

/// A committed margin change, as printed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub side: MarginSide,
    pub old: f64,
    pub new: f64,
    pub version: u64,
}

/// Final state after a page-mode scenario.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub margins: Margins,
    pub horizontal: HorizontalGeometry,
    pub vertical: VerticalGeometry,
    pub horizontal_markers: MarkerPositions,
    pub vertical_markers: MarkerPositions,
    pub ruler_scroll_top: f64,
    pub content_style: String,
    pub changes: Vec<ChangeRecord>,
    pub mutations: Vec<StyleMutation>,
}

/// Final state after an indent-mode scenario.
#[derive(Debug, Clone, Serialize)]
pub struct IndentReport {
    pub left_margin: f64,
    pub right_margin: f64,
    pub top_margin: f64,
    pub indent: ParagraphIndent,
    pub markers: IndentMarkerLayout,
    pub indicator: Option<f64>,
    pub content_style: String,
    pub document: serde_json::Value,
    pub html: String,
}

/// Result of a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    Page(PageReport),
    Indent(IndentReport),
}

/// Run `scenario` to completion.
pub fn run(scenario: &Scenario, config: &RulerConfig) -> Result<Report> {
    match scenario.mode {
        Mode::Page => run_page(scenario, config).map(Report::Page),
        Mode::Indent => run_indent(scenario, config).map(Report::Indent),
    }
}

fn pump(editor: &mut PageEditor<HeadlessPage>) {
    for trigger in editor.surface_mut().take_triggers() {
        editor.handle_geometry_event(trigger);
    }
}

fn axis_of(side: MarginSide) -> Axis {
    match side {
        MarginSide::Left | MarginSide::Right => Axis::Horizontal,
        MarginSide::Top | MarginSide::Bottom => Axis::Vertical,
    }
}

fn run_page(scenario: &Scenario, config: &RulerConfig) -> Result<PageReport> {
    let mut editor = PageEditor::new(HeadlessPage::new(scenario.layout), config);
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    editor.subscribe(move |change| {
        if let Ok(mut changes) = sink.lock() {
            changes.push(ChangeRecord {
                side: change.side,
                old: change.old,
                new: change.new,
                version: change.version,
            });
        }
    });
    let mut mutations = Vec::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(index, op = step.name(), "page step");
        match step {
            Step::Attach => editor.surface_mut().attach(),
            Step::Detach => editor.surface_mut().detach(),
            Step::Resize { width, height } => editor.surface_mut().resize(*width, *height),
            Step::Scroll { top } => editor.surface_mut().scroll_to(*top),
            Step::Style { css } => editor.surface_mut().set_content_style(css),
            Step::Drag { side, path } => {
                let axis = axis_of(*side);
                let sample = |page: &HeadlessPage, at: f64| match axis {
                    Axis::Horizontal => PointerSample::at(page.client_x_at(at), 0.0),
                    Axis::Vertical => PointerSample::at(0.0, page.client_y_at(at)),
                };
                let mut last = sample(editor.surface(), path.first().copied().unwrap_or_default());
                editor
                    .pointer_down(*side, last)
                    .with_context(|| format!("step {index}: drag"))?;
                for at in path {
                    last = sample(editor.surface(), *at);
                    editor.pointer_move(axis, last);
                }
                editor.pointer_up(axis, last);
            }
            Step::Preset { name } => {
                let preset: MarginPreset = name
                    .parse()
                    .map_err(|err: String| anyhow!("step {index}: {err}"))?;
                editor.apply_preset(preset);
            }
            Step::Manual { side, value } => {
                editor.set_manual_input(*side, value);
            }
            other => bail!("step {index}: `{}` is not available in page mode", other.name()),
        }
        pump(&mut editor);
        mutations.extend(editor.surface_mut().take_mutations());
    }

    let changes = changes
        .lock()
        .map_err(|_| anyhow!("change log poisoned"))?
        .clone();
    Ok(PageReport {
        margins: editor.margins(),
        horizontal: editor.horizontal().geometry(),
        vertical: editor.vertical().geometry(),
        horizontal_markers: editor.horizontal_markers(),
        vertical_markers: editor.vertical_markers(),
        ruler_scroll_top: editor.vertical().ruler_scroll_top(),
        content_style: editor.surface().content_style().to_css(),
        changes,
        mutations,
    })
}

fn initial_document(scenario: &Scenario) -> Result<Document> {
    match &scenario.document {
        Some(value) => Document::from_json(&value.to_string()).context("invalid `document`"),
        None => {
            let mut doc = Document::new();
            doc.push_paragraph("");
            Ok(doc)
        }
    }
}

fn run_indent(scenario: &Scenario, config: &RulerConfig) -> Result<IndentReport> {
    let page = HeadlessPage::new(scenario.layout);
    let mut editor = IndentEditor::new(page, initial_document(scenario)?, config);

    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(index, op = step.name(), "indent step");
        match step {
            Step::Attach => editor.surface_mut().attach(),
            Step::Detach => editor.surface_mut().detach(),
            Step::Resize { width, height } => editor.surface_mut().resize(*width, *height),
            Step::Scroll { top } => editor.surface_mut().scroll_to(*top),
            Step::Style { css } => editor.surface_mut().set_content_style(css),
            Step::Caret { block, offset } => {
                let key = editor
                    .host()
                    .blocks()
                    .get(*block)
                    .map(|b| b.key())
                    .ok_or_else(|| anyhow!("step {index}: no block {block}"))?;
                editor.host_mut().set_caret(key, *offset)?;
                editor.surface_mut().set_caret(Some(24.0 * *block as f64));
                editor.selection_changed();
            }
            Step::IndentDrag { marker, path } => {
                let first = path.first().copied().unwrap_or_default();
                editor
                    .pointer_down(*marker, PointerSample::at(first, 0.0))
                    .with_context(|| format!("step {index}: indent drag"))?;
                for x in path {
                    editor.pointer_move(PointerSample::at(*x, 0.0))?;
                }
                let last = path.last().copied().unwrap_or(first);
                editor.pointer_up(PointerSample::at(last, 0.0));
            }
            Step::TopDrag { path } => {
                let first = path.first().copied().unwrap_or_default();
                editor
                    .top_pointer_down(PointerSample::at(0.0, first))
                    .with_context(|| format!("step {index}: top drag"))?;
                for y in path {
                    editor.top_pointer_move(PointerSample::at(0.0, *y));
                }
                let last = path.last().copied().unwrap_or(first);
                editor.top_pointer_up(PointerSample::at(0.0, last));
            }
            Step::Enter => {
                editor.host_mut().insert_paragraph_break()?;
                editor.selection_changed();
            }
            Step::LineHeight { value } => {
                format::set_line_height(editor.host_mut(), value)?;
            }
            Step::Spacing { top, bottom } => {
                format::set_paragraph_spacing(editor.host_mut(), top.as_deref(), bottom.as_deref())?;
            }
            Step::FontSize { size } => {
                format::set_font_size(editor.host_mut(), size)?;
            }
            Step::HorizontalRule { thickness } => {
                editor.host_mut().insert_horizontal_rule(thickness.as_deref())?;
                editor.selection_changed();
            }
            other => bail!("step {index}: `{}` is not available in indent mode", other.name()),
        }
        for trigger in editor.surface_mut().take_triggers() {
            editor.handle_geometry_event(trigger);
        }
    }

    let ruler_width = editor.surface().horizontal_ruler_rect().width;
    let document: serde_json::Value = serde_json::from_str(&editor.host().to_json()?)?;
    Ok(IndentReport {
        left_margin: editor.ruler().left_margin(),
        right_margin: editor.ruler().right_margin(),
        top_margin: editor.top_ruler().top_margin(),
        indent: editor.ruler().indent(),
        markers: editor.ruler().marker_layout(ruler_width),
        indicator: editor.top_ruler().indicator(),
        content_style: editor.surface().content_style().to_css(),
        document,
        html: page_ruler::render_html(editor.host()),
    })
}
