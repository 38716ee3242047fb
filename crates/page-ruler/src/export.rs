//! HTML rendering for export collaborators.
//!
//! PDF and DOCX writers are external; they receive markup and a filename through the
//! [`Exporter`] trait and are expected to trigger the download themselves.

use std::fmt::Write as _;

use crate::document::{Block, Document, TextRun};
use crate::error::ExportError;
use crate::format::normalize_href;
use crate::indent::InlineStyle;
use crate::margins::Margins;

/// Export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Portable Document Format.
    Pdf,
    /// Word document.
    Docx,
}

impl ExportFormat {
    /// Filename used when the caller does not pick one.
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "resume.pdf",
            ExportFormat::Docx => "resume.docx",
        }
    }
}

/// An external export collaborator.
pub trait Exporter {
    /// Format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Hand `markup` over for export as `filename`.
    fn export(&mut self, markup: &str, filename: &str) -> Result<(), ExportError>;
}

/// Render `doc` as page HTML with `margins` as the content padding, and pass it to `exporter`.
pub fn export_document<E>(
    exporter: &mut E,
    doc: &Document,
    margins: Margins,
    filename: Option<&str>,
) -> Result<(), ExportError>
where
    E: Exporter + ?Sized,
{
    let filename = filename.unwrap_or(exporter.format().default_filename()).trim();
    if filename.is_empty() {
        return Err(ExportError::Failed {
            filename: filename.to_string(),
            message: "empty filename".to_string(),
        });
    }
    let markup = render_page_html(doc, margins);
    tracing::debug!(filename, bytes = markup.len(), "exporting document");
    exporter.export(&markup, filename)
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn rule_style(thickness: &str) -> InlineStyle {
    let mut style = InlineStyle::default();
    style.set("border", "none");
    style.set("border-top", format!("{} solid #000", thickness));
    style.set("width", "100%");
    style.set("max-width", "100%");
    style.set("margin", "12px 0");
    style.set("display", "block");
    style.set("box-sizing", "border-box");
    style
}

/// Inline style of a block as rendered.
pub fn block_style(block: &Block) -> InlineStyle {
    let mut style = InlineStyle::default();
    let (format, direction) = match block {
        Block::Paragraph(p) => (p.format, p.direction),
        Block::Heading(h) => (h.format, h.direction),
        Block::HorizontalRule(rule) => return rule_style(&rule.thickness),
    };
    if let Some(align) = format.text_align() {
        style.set("text-align", align);
    }
    let spacing = block.style();
    if let Some(line_height) = &spacing.line_height {
        style.set("line-height", line_height.as_str());
    }
    if let Some(top) = &spacing.margin_top {
        style.set("margin-top", top.as_str());
    }
    if let Some(bottom) = &spacing.margin_bottom {
        style.set("margin-bottom", bottom.as_str());
    }
    block.paragraph_indent().write_style(&mut style);
    if direction == Some(crate::document::Direction::Rtl) {
        style.set("direction", "rtl");
    }
    style
}

fn render_run(out: &mut String, run: &TextRun) {
    let text = match &run.font_size {
        Some(size) => format!(
            "<span style=\"font-size: {}\">{}</span>",
            escape_html(size),
            escape_html(&run.text)
        ),
        None => escape_html(&run.text),
    };
    match &run.link {
        Some(href) => {
            let _ = write!(
                out,
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&normalize_href(href)),
                text
            );
        }
        None => out.push_str(&text),
    }
}

/// Render the document body (one element per block).
pub fn render_html(doc: &Document) -> String {
    let mut out = String::new();
    for block in doc.blocks() {
        let tag = match block {
            Block::Paragraph(_) => "p".to_string(),
            Block::Heading(h) => format!("h{}", h.level),
            Block::HorizontalRule(rule) => {
                let _ = writeln!(
                    out,
                    "<hr style=\"{}\" data-thickness=\"{}\">",
                    escape_html(&block_style(block).to_css()),
                    escape_html(&rule.thickness)
                );
                continue;
            }
        };
        let style = block_style(block);
        if style.is_empty() {
            let _ = write!(out, "<{}>", tag);
        } else {
            let _ = write!(out, "<{} style=\"{}\">", tag, escape_html(&style.to_css()));
        }
        for run in block.children() {
            render_run(&mut out, run);
        }
        let _ = writeln!(out, "</{}>", tag);
    }
    out
}

/// Render the document wrapped in a page container padded by `margins`.
pub fn render_page_html(doc: &Document, margins: Margins) -> String {
    let mut page = InlineStyle::default();
    page.set_px("padding-top", margins.top);
    page.set_px("padding-right", margins.right);
    page.set_px("padding-bottom", margins.bottom);
    page.set_px("padding-left", margins.left);
    format!(
        "<div style=\"{}\">\n{}</div>\n",
        escape_html(&page.to_css()),
        render_html(doc)
    )
}
