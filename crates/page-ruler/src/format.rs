//! Formatting commands (font size, line height, paragraph spacing) and link normalization.
//!
//! The block commands apply to every block touched by the selection. A collapsed selection
//! touches the block under the caret. Font size is a text mark and applies to the selected
//! text, or to the whole caret block when the selection is collapsed.

use unicode_segmentation::UnicodeSegmentation;

use crate::document::{BlockStyle, Document, NodeKey};
use crate::error::DocumentError;

/// Font size shown for text without an explicit size.
pub const DEFAULT_FONT_SIZE: &str = "11pt";

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn edit_selected<F>(doc: &mut Document, mut edit: F) -> Result<bool, DocumentError>
where
    F: FnMut(&mut BlockStyle),
{
    let keys: Vec<NodeKey> = doc.selected_keys();
    if keys.is_empty() {
        return Ok(false);
    }
    doc.update(|tx| {
        let mut changed = false;
        for key in keys {
            changed |= tx.edit_style(key, &mut edit)?;
        }
        Ok(changed)
    })
}

/// Parse a font size in points: `"14"`, `"10.5"` or `"12pt"`. Empty input clears (`None`).
pub fn parse_font_size(size: &str) -> Result<Option<String>, DocumentError> {
    let trimmed = size.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let number = trimmed.strip_suffix("pt").unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(points) if points.is_finite() && points > 0.0 => Ok(Some(format!("{}pt", points))),
        _ => Err(DocumentError::InvalidFontSize(size.to_string())),
    }
}

/// Set the font size of the selection in points. An empty value clears it.
///
/// Returns `false` without a selection or when nothing changed.
pub fn set_font_size(doc: &mut Document, size: &str) -> Result<bool, DocumentError> {
    let font_size = parse_font_size(size)?;
    let Some(selection) = doc.selection() else {
        return Ok(false);
    };
    doc.set_font_size(selection, font_size.as_deref())
}

/// Font size of the text just before the caret (the first run at the start of a block).
pub fn font_size_at_caret(doc: &Document) -> String {
    let size = doc.selection().and_then(|selection| {
        let block = doc.block(selection.anchor.key)?;
        let mut remaining = selection.anchor.offset;
        let mut current = block.children().first()?;
        for run in block.children() {
            current = run;
            let len = run.text.graphemes(true).count();
            if remaining <= len {
                break;
            }
            remaining -= len;
        }
        current.font_size.clone()
    });
    size.unwrap_or_else(|| DEFAULT_FONT_SIZE.to_string())
}

/// Set `line-height` on the selected blocks. An empty value clears it.
pub fn set_line_height(doc: &mut Document, line_height: &str) -> Result<bool, DocumentError> {
    let value = non_empty(line_height);
    edit_selected(doc, |style| style.line_height = value.clone())
}

/// Set paragraph spacing on the selected blocks.
///
/// `None` leaves a side untouched; `Some("")` clears it.
pub fn set_paragraph_spacing(
    doc: &mut Document,
    margin_top: Option<&str>,
    margin_bottom: Option<&str>,
) -> Result<bool, DocumentError> {
    if margin_top.is_none() && margin_bottom.is_none() {
        return Ok(false);
    }
    let top = margin_top.map(non_empty);
    let bottom = margin_bottom.map(non_empty);
    edit_selected(doc, |style| {
        if let Some(top) = &top {
            style.margin_top = top.clone();
        }
        if let Some(bottom) = &bottom {
            style.margin_bottom = bottom.clone();
        }
    })
}

/// Clear paragraph spacing on the selected blocks. Returns `false` if none had any.
pub fn remove_paragraph_spacing(doc: &mut Document) -> Result<bool, DocumentError> {
    edit_selected(doc, |style| {
        style.margin_top = None;
        style.margin_bottom = None;
    })
}

/// Normalize a link target for rendering and export.
///
/// - `mailto:` and `http(s)` targets are kept.
/// - A bare address containing `@` gets `mailto:`.
/// - Anything else (including LinkedIn profiles typed without a scheme) gets `https://`.
pub fn normalize_href(href: &str) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with("mailto:") || href.starts_with("http") {
        return href.to_string();
    }
    if href.contains('@') {
        return format!("mailto:{}", href);
    }
    format!("https://{}", href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Caret};

    fn three_blocks() -> (Document, Vec<NodeKey>) {
        let mut doc = Document::new();
        let keys = vec![
            doc.push_heading(1, "Jane Doe"),
            doc.push_paragraph("Engineer"),
            doc.push_paragraph("Berlin"),
        ];
        (doc, keys)
    }

    #[test]
    fn test_line_height_applies_to_range() {
        let (mut doc, keys) = three_blocks();
        doc.select(Caret { key: keys[0], offset: 0 }, Caret { key: keys[1], offset: 2 })
            .unwrap();

        assert!(set_line_height(&mut doc, "1.15").unwrap());
        assert_eq!(doc.block(keys[0]).unwrap().style().line_height.as_deref(), Some("1.15"));
        assert_eq!(doc.block(keys[1]).unwrap().style().line_height.as_deref(), Some("1.15"));
        assert_eq!(doc.block(keys[2]).unwrap().style().line_height, None);

        // Same value again is a no-op.
        assert!(!set_line_height(&mut doc, "1.15").unwrap());
        assert!(set_line_height(&mut doc, "").unwrap());
        assert_eq!(doc.block(keys[0]).unwrap().style().line_height, None);
    }

    #[test]
    fn test_paragraph_spacing_falls_back_to_caret_block() {
        let (mut doc, keys) = three_blocks();
        doc.set_caret(keys[2], 0).unwrap();

        assert!(set_paragraph_spacing(&mut doc, Some("12pt"), None).unwrap());
        let style = doc.block(keys[2]).unwrap().style().clone();
        assert_eq!(style.margin_top.as_deref(), Some("12pt"));
        assert_eq!(style.margin_bottom, None);

        assert!(remove_paragraph_spacing(&mut doc).unwrap());
        assert!(!remove_paragraph_spacing(&mut doc).unwrap());
        assert!(matches!(doc.block(keys[2]), Some(Block::Paragraph(_))));
    }

    #[test]
    fn test_no_selection_is_a_no_op() {
        let (mut doc, _) = three_blocks();
        assert!(!set_line_height(&mut doc, "2").unwrap());
        assert!(!set_font_size(&mut doc, "14").unwrap());
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("14").unwrap().as_deref(), Some("14pt"));
        assert_eq!(parse_font_size(" 10.5pt ").unwrap().as_deref(), Some("10.5pt"));
        assert_eq!(parse_font_size("").unwrap(), None);
        assert_eq!(
            parse_font_size("-3").unwrap_err(),
            DocumentError::InvalidFontSize("-3".into())
        );
        assert!(parse_font_size("big").is_err());
    }

    #[test]
    fn test_normalize_href() {
        assert_eq!(normalize_href("jane@example.com"), "mailto:jane@example.com");
        assert_eq!(normalize_href("mailto:jane@example.com"), "mailto:jane@example.com");
        assert_eq!(normalize_href("linkedin.com/in/jane"), "https://linkedin.com/in/jane");
        assert_eq!(normalize_href("https://example.com"), "https://example.com");
        assert_eq!(normalize_href("example.com"), "https://example.com");
    }
}
