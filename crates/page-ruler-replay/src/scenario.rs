//! Scenario files.
//!
//! A scenario is a JSON document describing the page, an optional starting document, and a list
//! of steps:
//!
//! ```json
//! {
//!   "mode": "page",
//!   "layout": { "viewport_width": 1280 },
//!   "steps": [
//!     { "op": "attach" },
//!     { "op": "drag", "side": "right", "path": [720, 710, 700] },
//!     { "op": "preset", "name": "narrow" }
//!   ]
//! }
//! ```
//!
//! Drag paths on the page rulers are positions relative to the document's left (or top) edge.
//! Indent ruler paths are plain pointer coordinates; only their deltas matter.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use page_ruler::{IndentMarker, MarginSide};
use page_ruler_headless::PageLayout;
use serde::Deserialize;

/// Which editor the scenario drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Page rulers with the margin control.
    #[default]
    Page,
    /// Paragraph indent ruler with the top-margin ruler.
    Indent,
}

/// A parsed scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub layout: PageLayout,
    /// Starting document in the editor's JSON export format (indent mode only).
    #[serde(default)]
    pub document: Option<serde_json::Value>,
    pub steps: Vec<Step>,
}

/// One scripted action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Finish the first layout pass.
    Attach,
    /// Unmount the document.
    Detach,
    /// Resize the window.
    Resize { width: f64, height: f64 },
    /// Scroll the document container.
    Scroll { top: f64 },
    /// Replace the content box's inline style.
    Style { css: String },
    /// Drag a page margin marker along `path`.
    Drag { side: MarginSide, path: Vec<f64> },
    /// Pick a margin preset by name.
    Preset { name: String },
    /// Type a value into a margin field.
    Manual { side: MarginSide, value: String },
    /// Place the caret in the `block`-th block (indent mode).
    Caret { block: usize, offset: usize },
    /// Drag an indent ruler marker along `path`.
    IndentDrag { marker: IndentMarker, path: Vec<f64> },
    /// Drag the top-margin ruler along `path`.
    TopDrag { path: Vec<f64> },
    /// Press Enter at the caret.
    Enter,
    /// Set line height on the selection.
    LineHeight { value: String },
    /// Set paragraph spacing on the selection.
    Spacing {
        #[serde(default)]
        top: Option<String>,
        #[serde(default)]
        bottom: Option<String>,
    },
    /// Set the font size of the selected text (`""` clears it).
    FontSize { size: String },
    /// Insert a horizontal rule after the caret block.
    HorizontalRule {
        #[serde(default)]
        thickness: Option<String>,
    },
}

impl Step {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Attach => "attach",
            Step::Detach => "detach",
            Step::Resize { .. } => "resize",
            Step::Scroll { .. } => "scroll",
            Step::Style { .. } => "style",
            Step::Drag { .. } => "drag",
            Step::Preset { .. } => "preset",
            Step::Manual { .. } => "manual",
            Step::Caret { .. } => "caret",
            Step::IndentDrag { .. } => "indent_drag",
            Step::TopDrag { .. } => "top_drag",
            Step::Enter => "enter",
            Step::LineHeight { .. } => "line_height",
            Step::Spacing { .. } => "spacing",
            Step::FontSize { .. } => "font_size",
            Step::HorizontalRule { .. } => "horizontal_rule",
        }
    }

    fn path(&self) -> Option<&[f64]> {
        match self {
            Step::Drag { path, .. } | Step::IndentDrag { path, .. } | Step::TopDrag { path } => {
                Some(path)
            }
            _ => None,
        }
    }
}

impl Scenario {
    /// Parse a scenario from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json).context("invalid scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in scenario {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if step.path().is_some_and(<[f64]>::is_empty) {
                bail!("step {} ({}): drag path is empty", index, step.name());
            }
        }
        if self.mode == Mode::Page && self.document.is_some() {
            bail!("`document` is only used in indent mode");
        }
        Ok(())
    }
}
