//! Paragraph document model.
//!
//! A small block-level document: an ordered list of paragraphs, headings and horizontal rules,
//! with text held in [`TextRun`]s and a caret/range selection addressed by node key. It is the reference
//! [`IndentHost`] used by the paragraph ruler and the JSON format the indent attributes persist
//! through.
//!
//! Paragraph capability is explicit: a paragraph is either [`ParagraphCapability::Plain`] or
//! [`ParagraphCapability::Indentable`]. A plain paragraph becomes indentable only through
//! [`Transaction::upgrade_paragraph_for_indent`], which keeps the node key, children, format and
//! direction so a selection pointing at the paragraph stays valid.
//!
//! All mutations go through [`Document::update`]: the closure edits a draft and the draft is
//! committed only if the closure returns `Ok`.
//!
//! # Example
//!
//! ```rust
//! use page_ruler::{Document, IndentHost, IndentWrite, ParagraphIndent};
//!
//! let mut doc = Document::new();
//! let key = doc.push_paragraph("Experience");
//! doc.set_caret(key, 0).unwrap();
//!
//! let write = doc
//!     .write_active_paragraph_indent(ParagraphIndent::new(24.0, -12.0, 8.0))
//!     .unwrap();
//! assert_eq!(write, IndentWrite::Upgraded);
//! assert_eq!(doc.block(key).unwrap().type_name(), "ruler-paragraph");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::DocumentError;
use crate::indent::ParagraphIndent;
use crate::surface::{IndentHost, IndentWrite};

/// Stable identity of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

/// Block alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementFormat {
    /// Inherit.
    #[default]
    #[serde(rename = "")]
    None,
    /// Left aligned.
    Left,
    /// Start aligned.
    Start,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// End aligned.
    End,
    /// Justified.
    Justify,
}

impl ElementFormat {
    /// CSS `text-align` value, if any.
    pub fn text_align(self) -> Option<&'static str> {
        match self {
            ElementFormat::None => None,
            ElementFormat::Left => Some("left"),
            ElementFormat::Start => Some("start"),
            ElementFormat::Center => Some("center"),
            ElementFormat::Right => Some("right"),
            ElementFormat::End => Some("end"),
            ElementFormat::Justify => Some("justify"),
        }
    }
}

/// Thickness of a horizontal rule inserted without an explicit one.
pub const DEFAULT_RULE_THICKNESS: &str = "1px";

/// A run of text, optionally linked and sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Text content.
    pub text: String,
    /// Link target, if this run is a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// CSS font size in points (`"14pt"`); `None` inherits the page default.
    #[serde(default, rename = "fontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl TextRun {
    /// Plain text run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
            font_size: None,
        }
    }

    /// Linked text run.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(href.into()),
            font_size: None,
        }
    }

    /// The same run with `font_size` set.
    pub fn with_font_size(mut self, font_size: impl Into<String>) -> Self {
        self.font_size = Some(font_size.into());
        self
    }

    fn same_marks(&self, other: &TextRun) -> bool {
        self.link == other.link && self.font_size == other.font_size
    }
}

/// Block-level spacing attributes shared by paragraphs and headings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    /// CSS `line-height` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    /// CSS `margin-top` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    /// CSS `margin-bottom` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
}

/// What a paragraph can carry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParagraphCapability {
    /// A plain paragraph; indentation reads as zero and cannot be written.
    #[default]
    Plain,
    /// An indent-capable paragraph with persisted indentation.
    Indentable(ParagraphIndent),
}

impl ParagraphCapability {
    /// Indentation, zero for plain paragraphs.
    pub fn indent(&self) -> ParagraphIndent {
        match self {
            ParagraphCapability::Plain => ParagraphIndent::ZERO,
            ParagraphCapability::Indentable(indent) => *indent,
        }
    }
}

/// A paragraph block.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Node key.
    pub key: NodeKey,
    /// Plain or indent-capable.
    pub capability: ParagraphCapability,
    /// Alignment.
    pub format: ElementFormat,
    /// Discrete indent level (tab-style indentation, independent of the ruler).
    pub indent: u32,
    /// Text direction, if resolved.
    pub direction: Option<Direction>,
    /// Spacing attributes.
    pub style: BlockStyle,
    /// Content.
    pub children: Vec<TextRun>,
}

impl Paragraph {
    /// Empty plain paragraph.
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            capability: ParagraphCapability::Plain,
            format: ElementFormat::None,
            indent: 0,
            direction: None,
            style: BlockStyle::default(),
            children: Vec::new(),
        }
    }

    /// Whether this paragraph carries indent attributes.
    pub fn is_indentable(&self) -> bool {
        matches!(self.capability, ParagraphCapability::Indentable(_))
    }
}

/// A heading block (levels 1 to 3).
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Node key.
    pub key: NodeKey,
    /// Heading level.
    pub level: u8,
    /// Alignment.
    pub format: ElementFormat,
    /// Text direction, if resolved.
    pub direction: Option<Direction>,
    /// Spacing attributes.
    pub style: BlockStyle,
    /// Content.
    pub children: Vec<TextRun>,
}

/// A horizontal rule between blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalRule {
    /// Node key.
    pub key: NodeKey,
    /// CSS border width, e.g. `1px`.
    pub thickness: String,
}

impl HorizontalRule {
    /// Rule with the default thickness.
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            thickness: DEFAULT_RULE_THICKNESS.to_string(),
        }
    }
}

static NO_STYLE: BlockStyle = BlockStyle {
    line_height: None,
    margin_top: None,
    margin_bottom: None,
};

/// A top-level block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Paragraph (plain or indent-capable).
    Paragraph(Paragraph),
    /// Heading.
    Heading(Heading),
    /// Horizontal rule; holds no text.
    HorizontalRule(HorizontalRule),
}

impl Block {
    /// Node key.
    pub fn key(&self) -> NodeKey {
        match self {
            Block::Paragraph(p) => p.key,
            Block::Heading(h) => h.key,
            Block::HorizontalRule(r) => r.key,
        }
    }

    fn set_key(&mut self, key: NodeKey) {
        match self {
            Block::Paragraph(p) => p.key = key,
            Block::Heading(h) => h.key = key,
            Block::HorizontalRule(r) => r.key = key,
        }
    }

    /// Serialized type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Paragraph(p) if p.is_indentable() => "ruler-paragraph",
            Block::Paragraph(_) => "paragraph",
            Block::Heading(_) => "heading",
            Block::HorizontalRule(_) => "horizontalrule",
        }
    }

    /// Content runs.
    pub fn children(&self) -> &[TextRun] {
        match self {
            Block::Paragraph(p) => &p.children,
            Block::Heading(h) => &h.children,
            Block::HorizontalRule(_) => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<TextRun>> {
        match self {
            Block::Paragraph(p) => Some(&mut p.children),
            Block::Heading(h) => Some(&mut h.children),
            Block::HorizontalRule(_) => None,
        }
    }

    /// Spacing attributes. Rules have none.
    pub fn style(&self) -> &BlockStyle {
        match self {
            Block::Paragraph(p) => &p.style,
            Block::Heading(h) => &h.style,
            Block::HorizontalRule(_) => &NO_STYLE,
        }
    }

    /// Mutable spacing attributes; `None` for rules.
    pub fn style_mut(&mut self) -> Option<&mut BlockStyle> {
        match self {
            Block::Paragraph(p) => Some(&mut p.style),
            Block::Heading(h) => Some(&mut h.style),
            Block::HorizontalRule(_) => None,
        }
    }

    /// Concatenated text.
    pub fn text(&self) -> String {
        self.children().iter().map(|run| run.text.as_str()).collect()
    }

    /// Length in grapheme clusters.
    pub fn grapheme_len(&self) -> usize {
        self.children()
            .iter()
            .map(|run| run.text.graphemes(true).count())
            .sum()
    }

    /// Indentation as rendered (zero for plain paragraphs and headings).
    pub fn paragraph_indent(&self) -> ParagraphIndent {
        match self {
            Block::Paragraph(p) => p.capability.indent(),
            Block::Heading(_) | Block::HorizontalRule(_) => ParagraphIndent::ZERO,
        }
    }
}

/// A collapsed selection point: a block and a grapheme offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    /// Block the caret is in.
    pub key: NodeKey,
    /// Grapheme offset within the block's text.
    pub offset: usize,
}

/// A range selection between two carets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: Caret,
    /// Where the selection ends (the moving end).
    pub focus: Caret,
}

impl Selection {
    /// Collapsed selection at `caret`.
    pub fn collapsed(caret: Caret) -> Self {
        Self {
            anchor: caret,
            focus: caret,
        }
    }

    /// Whether anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// The document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    blocks: Vec<Block>,
    selection: Option<Selection>,
    next_key: u64,
    version: u64,
}

/// A draft of the document inside [`Document::update`].
#[derive(Debug)]
pub struct Transaction {
    draft: Document,
    dirty: bool,
}

impl Document {
    /// Empty document without selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block with `key`.
    pub fn block(&self, key: NodeKey) -> Option<&Block> {
        self.blocks.iter().find(|b| b.key() == key)
    }

    /// Current selection.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Number of committed transactions that changed the document.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Top-level block under the selection anchor.
    pub fn anchor_block(&self) -> Option<&Block> {
        self.block(self.selection?.anchor.key)
    }

    /// Keys of every block touched by the selection, in document order.
    pub fn selected_keys(&self) -> Vec<NodeKey> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        let (Some(a), Some(b)) = (
            self.index_of(selection.anchor.key),
            self.index_of(selection.focus.key),
        ) else {
            return Vec::new();
        };
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        self.blocks[start..=end].iter().map(Block::key).collect()
    }

    fn index_of(&self, key: NodeKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key() == key)
    }

    fn allocate_key(&mut self) -> NodeKey {
        self.next_key += 1;
        NodeKey(self.next_key)
    }

    /// Run `edit` against a draft and commit it if it returns `Ok`.
    ///
    /// The version is bumped only if the transaction changed something.
    pub fn update<T, F>(&mut self, edit: F) -> Result<T, DocumentError>
    where
        F: FnOnce(&mut Transaction) -> Result<T, DocumentError>,
    {
        let mut tx = Transaction {
            draft: self.clone(),
            dirty: false,
        };
        let value = edit(&mut tx)?;
        if tx.dirty {
            let version = self.version + 1;
            *self = tx.draft;
            self.version = version;
        }
        Ok(value)
    }

    /// Append a plain paragraph with `text`.
    pub fn push_paragraph(&mut self, text: &str) -> NodeKey {
        let key = self.allocate_key();
        let mut paragraph = Paragraph::new(key);
        if !text.is_empty() {
            paragraph.children.push(TextRun::plain(text));
        }
        self.blocks.push(Block::Paragraph(paragraph));
        self.version += 1;
        key
    }

    /// Append a heading with `text`. Levels are clamped to `1..=3`.
    pub fn push_heading(&mut self, level: u8, text: &str) -> NodeKey {
        let key = self.allocate_key();
        self.blocks.push(Block::Heading(Heading {
            key,
            level: level.clamp(1, 3),
            format: ElementFormat::None,
            direction: None,
            style: BlockStyle::default(),
            children: vec![TextRun::plain(text)],
        }));
        self.version += 1;
        key
    }

    /// Append an already-built block, assigning it a fresh key.
    pub fn push_block(&mut self, mut block: Block) -> NodeKey {
        let key = self.allocate_key();
        block.set_key(key);
        self.blocks.push(block);
        self.version += 1;
        key
    }

    /// Place a collapsed caret.
    pub fn set_caret(&mut self, key: NodeKey, offset: usize) -> Result<(), DocumentError> {
        self.update(|tx| tx.set_selection(Selection::collapsed(Caret { key, offset })))
    }

    /// Select from `anchor` to `focus`.
    pub fn select(&mut self, anchor: Caret, focus: Caret) -> Result<(), DocumentError> {
        self.update(|tx| tx.set_selection(Selection { anchor, focus }))
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// See [`Transaction::upgrade_paragraph_for_indent`].
    pub fn upgrade_paragraph_for_indent(&mut self, key: NodeKey) -> Result<bool, DocumentError> {
        self.update(|tx| tx.upgrade_paragraph_for_indent(key))
    }

    /// See [`Transaction::set_paragraph_indent`].
    pub fn set_paragraph_indent(
        &mut self,
        key: NodeKey,
        indent: ParagraphIndent,
    ) -> Result<(), DocumentError> {
        self.update(|tx| tx.set_paragraph_indent(key, indent))
    }

    /// See [`Transaction::insert_paragraph_break`].
    pub fn insert_paragraph_break(&mut self) -> Result<Option<NodeKey>, DocumentError> {
        self.update(|tx| tx.insert_paragraph_break())
    }

    /// See [`Transaction::insert_horizontal_rule`].
    pub fn insert_horizontal_rule(
        &mut self,
        thickness: Option<&str>,
    ) -> Result<NodeKey, DocumentError> {
        self.update(|tx| tx.insert_horizontal_rule(thickness))
    }

    /// See [`Transaction::set_font_size`].
    pub fn set_font_size(
        &mut self,
        selection: Selection,
        font_size: Option<&str>,
    ) -> Result<bool, DocumentError> {
        self.update(|tx| tx.set_font_size(selection, font_size))
    }

    /// See [`Transaction::remove_block`].
    pub fn remove_block(&mut self, key: NodeKey) -> Result<Block, DocumentError> {
        self.update(|tx| tx.remove_block(key))
    }
}

impl Transaction {
    /// The draft as edited so far.
    pub fn document(&self) -> &Document {
        &self.draft
    }

    fn block_mut(&mut self, key: NodeKey) -> Result<&mut Block, DocumentError> {
        self.draft
            .blocks
            .iter_mut()
            .find(|b| b.key() == key)
            .ok_or(DocumentError::UnknownNode(key))
    }

    fn paragraph_mut(&mut self, key: NodeKey) -> Result<&mut Paragraph, DocumentError> {
        match self.block_mut(key)? {
            Block::Paragraph(p) => Ok(p),
            other => Err(DocumentError::NotAParagraph {
                key,
                found: other.type_name(),
            }),
        }
    }

    /// Mark the draft as changed without a specific edit.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    /// Replace the selection. Both ends must name existing blocks; offsets are clamped.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), DocumentError> {
        let clamp = |doc: &Document, caret: Caret| -> Result<Caret, DocumentError> {
            let block = doc
                .block(caret.key)
                .ok_or(DocumentError::UnknownNode(caret.key))?;
            Ok(Caret {
                key: caret.key,
                offset: caret.offset.min(block.grapheme_len()),
            })
        };
        let selection = Selection {
            anchor: clamp(&self.draft, selection.anchor)?,
            focus: clamp(&self.draft, selection.focus)?,
        };
        if self.draft.selection != Some(selection) {
            self.draft.selection = Some(selection);
            self.dirty = true;
        }
        Ok(())
    }

    /// Turn a plain paragraph into an indent-capable one with zero indentation.
    ///
    /// The replacement keeps the key, children, format, indent level, direction and spacing, so
    /// carets addressing the paragraph stay where they were. Returns `false` if the paragraph
    /// was already indentable.
    pub fn upgrade_paragraph_for_indent(&mut self, key: NodeKey) -> Result<bool, DocumentError> {
        let index = self
            .draft
            .index_of(key)
            .ok_or(DocumentError::UnknownNode(key))?;

        let plain = match &mut self.draft.blocks[index] {
            Block::Paragraph(p) if p.is_indentable() => return Ok(false),
            Block::Paragraph(p) => p,
            other => {
                return Err(DocumentError::NotAParagraph {
                    key,
                    found: other.type_name(),
                });
            }
        };

        let upgraded = Paragraph {
            key: plain.key,
            capability: ParagraphCapability::Indentable(ParagraphIndent::ZERO),
            format: plain.format,
            indent: plain.indent,
            direction: plain.direction,
            style: std::mem::take(&mut plain.style),
            children: std::mem::take(&mut plain.children),
        };
        self.draft.blocks[index] = Block::Paragraph(upgraded);
        self.dirty = true;
        tracing::debug!(%key, "paragraph upgraded for indentation");
        Ok(true)
    }

    /// Write indentation onto an indent-capable paragraph.
    pub fn set_paragraph_indent(
        &mut self,
        key: NodeKey,
        indent: ParagraphIndent,
    ) -> Result<(), DocumentError> {
        let paragraph = self.paragraph_mut(key)?;
        match &mut paragraph.capability {
            ParagraphCapability::Plain => Err(DocumentError::NotIndentable(key)),
            ParagraphCapability::Indentable(current) => {
                if *current != indent {
                    *current = indent;
                    self.dirty = true;
                }
                Ok(())
            }
        }
    }

    /// Split the anchor block at the caret (the Enter key).
    ///
    /// The new paragraph follows the current block and takes the text after the caret. A
    /// paragraph's successor inherits its capability (including indentation), format, indent
    /// level and direction; a heading's successor is a plain paragraph. The caret moves to the
    /// start of the new paragraph. Returns `None` without a selection.
    pub fn insert_paragraph_break(&mut self) -> Result<Option<NodeKey>, DocumentError> {
        let Some(selection) = self.draft.selection else {
            return Ok(None);
        };
        let caret = selection.anchor;
        let index = self
            .draft
            .index_of(caret.key)
            .ok_or(DocumentError::UnknownNode(caret.key))?;

        let new_key = self.draft.allocate_key();
        let block = &mut self.draft.blocks[index];
        let tail = block
            .children_mut()
            .map(|runs| split_runs_at(runs, caret.offset))
            .unwrap_or_default();

        let mut successor = Paragraph::new(new_key);
        successor.children = tail;
        match block {
            Block::Paragraph(p) => {
                successor.capability = p.capability;
                successor.format = p.format;
                successor.indent = p.indent;
                successor.direction = p.direction;
            }
            Block::Heading(h) => {
                successor.direction = h.direction;
            }
            Block::HorizontalRule(_) => {}
        }

        self.draft
            .blocks
            .insert(index + 1, Block::Paragraph(successor));
        self.draft.selection = Some(Selection::collapsed(Caret {
            key: new_key,
            offset: 0,
        }));
        self.dirty = true;
        Ok(Some(new_key))
    }

    /// Insert a horizontal rule after the anchor block (at the end without a selection).
    ///
    /// An empty `thickness` falls back to [`DEFAULT_RULE_THICKNESS`]. A rule never ends the
    /// document: a trailing rule gets an empty plain paragraph after it. The caret moves to the
    /// start of the block following the rule.
    pub fn insert_horizontal_rule(
        &mut self,
        thickness: Option<&str>,
    ) -> Result<NodeKey, DocumentError> {
        let index = match self.draft.selection {
            Some(selection) => {
                let key = selection.anchor.key;
                self.draft
                    .index_of(key)
                    .ok_or(DocumentError::UnknownNode(key))?
                    + 1
            }
            None => self.draft.blocks.len(),
        };

        let key = self.draft.allocate_key();
        let mut rule = HorizontalRule::new(key);
        if let Some(thickness) = thickness.map(str::trim).filter(|t| !t.is_empty()) {
            rule.thickness = thickness.to_string();
        }
        self.draft.blocks.insert(index, Block::HorizontalRule(rule));

        let next = match self.draft.blocks.get(index + 1) {
            Some(block) => block.key(),
            None => {
                let paragraph_key = self.draft.allocate_key();
                self.draft
                    .blocks
                    .push(Block::Paragraph(Paragraph::new(paragraph_key)));
                paragraph_key
            }
        };
        self.draft.selection = Some(Selection::collapsed(Caret {
            key: next,
            offset: 0,
        }));
        self.dirty = true;
        tracing::debug!(%key, "horizontal rule inserted");
        Ok(key)
    }

    /// Set the font size of the text covered by `selection`; `None` clears it.
    ///
    /// A collapsed selection covers the whole block under the caret. Adjacent runs that end up
    /// with the same marks are merged. Returns `false` if no run changed.
    pub fn set_font_size(
        &mut self,
        selection: Selection,
        font_size: Option<&str>,
    ) -> Result<bool, DocumentError> {
        let index_of = |caret: Caret| {
            self.draft
                .index_of(caret.key)
                .ok_or(DocumentError::UnknownNode(caret.key))
        };
        let anchor = (index_of(selection.anchor)?, selection.anchor.offset);
        let focus = (index_of(selection.focus)?, selection.focus.offset);
        let (start, end) = if anchor <= focus {
            (anchor, focus)
        } else {
            (focus, anchor)
        };

        let collapsed = selection.is_collapsed();
        let mut changed = false;
        for index in start.0..=end.0 {
            let Some(runs) = self.draft.blocks[index].children_mut() else {
                continue;
            };
            let from = if !collapsed && index == start.0 { start.1 } else { 0 };
            let to = if !collapsed && index == end.0 { end.1 } else { usize::MAX };
            changed |= mark_font_size(runs, from, to, font_size);
        }
        if changed {
            self.dirty = true;
        }
        Ok(changed)
    }

    /// Delete a block. A selection touching it collapses onto the nearest remaining block.
    pub fn remove_block(&mut self, key: NodeKey) -> Result<Block, DocumentError> {
        let index = self
            .draft
            .index_of(key)
            .ok_or(DocumentError::UnknownNode(key))?;
        let removed = self.draft.blocks.remove(index);

        if let Some(selection) = self.draft.selection
            && (selection.anchor.key == key || selection.focus.key == key)
        {
            let neighbor = self
                .draft
                .blocks
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.draft.blocks.get(i)));
            self.draft.selection = neighbor.map(|b| {
                Selection::collapsed(Caret {
                    key: b.key(),
                    offset: 0,
                })
            });
        }
        self.dirty = true;
        Ok(removed)
    }

    /// Apply `edit` to the spacing attributes of `key`.
    pub fn edit_style<F>(&mut self, key: NodeKey, edit: F) -> Result<bool, DocumentError>
    where
        F: FnOnce(&mut BlockStyle),
    {
        let Some(style) = self.block_mut(key)?.style_mut() else {
            return Ok(false);
        };
        let before = style.clone();
        edit(style);
        let changed = *style != before;
        if changed {
            self.dirty = true;
        }
        Ok(changed)
    }
}

/// Split `runs` at grapheme `offset`, returning the runs after it.
fn split_runs_at(runs: &mut Vec<TextRun>, offset: usize) -> Vec<TextRun> {
    let mut remaining = offset;
    for index in 0..runs.len() {
        let len = runs[index].text.graphemes(true).count();
        if remaining < len || (remaining == len && index + 1 == runs.len()) {
            let byte = runs[index]
                .text
                .grapheme_indices(true)
                .nth(remaining)
                .map_or(runs[index].text.len(), |(i, _)| i);

            let mut tail = runs.split_off(index + 1);
            let head = &mut runs[index];
            let rest = head.text.split_off(byte);
            if !rest.is_empty() {
                tail.insert(
                    0,
                    TextRun {
                        text: rest,
                        link: head.link.clone(),
                        font_size: head.font_size.clone(),
                    },
                );
            }
            if head.text.is_empty() {
                runs.pop();
            }
            return tail;
        }
        remaining -= len;
    }
    Vec::new()
}

/// Apply `font_size` to graphemes `from..to` of `runs`.
fn mark_font_size(runs: &mut Vec<TextRun>, from: usize, to: usize, font_size: Option<&str>) -> bool {
    let total: usize = runs.iter().map(|run| run.text.graphemes(true).count()).sum();
    let to = to.min(total);
    if from >= to {
        return false;
    }
    let tail = split_runs_at(runs, to);
    let middle = split_runs_at(runs, from);

    let mut changed = false;
    for mut run in middle {
        if run.font_size.as_deref() != font_size {
            run.font_size = font_size.map(str::to_string);
            changed = true;
        }
        runs.push(run);
    }
    runs.extend(tail);
    merge_runs(runs);
    changed
}

fn merge_runs(runs: &mut Vec<TextRun>) {
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        match merged.last_mut() {
            Some(last) if last.same_marks(&run) => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    *runs = merged;
}

impl IndentHost for Document {
    fn active_paragraph_indent(&self) -> Option<ParagraphIndent> {
        self.anchor_block().map(Block::paragraph_indent)
    }

    fn write_active_paragraph_indent(
        &mut self,
        indent: ParagraphIndent,
    ) -> Result<IndentWrite, DocumentError> {
        let Some(selection) = self.selection else {
            return Ok(IndentWrite::NoSelection);
        };
        let key = selection.anchor.key;

        self.update(|tx| {
            let upgraded = match tx.document().block(key) {
                None => return Err(DocumentError::UnknownNode(key)),
                Some(Block::Heading(_) | Block::HorizontalRule(_)) => {
                    return Ok(IndentWrite::NotIndentable);
                }
                Some(Block::Paragraph(_)) => tx.upgrade_paragraph_for_indent(key)?,
            };
            tx.set_paragraph_indent(key, indent)?;
            Ok(if upgraded {
                IndentWrite::Upgraded
            } else {
                IndentWrite::Updated
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with(texts: &[&str]) -> (Document, Vec<NodeKey>) {
        let mut doc = Document::new();
        let keys = texts.iter().map(|t| doc.push_paragraph(t)).collect();
        (doc, keys)
    }

    #[test]
    fn test_upgrade_preserves_content_and_key() {
        let (mut doc, keys) = doc_with(&["Summary"]);
        doc.update(|tx| {
            let Block::Paragraph(p) = tx.block_mut(keys[0])? else {
                unreachable!()
            };
            p.format = ElementFormat::Center;
            p.direction = Some(Direction::Rtl);
            p.indent = 2;
            tx.touch();
            Ok(())
        })
        .unwrap();
        doc.set_caret(keys[0], 3).unwrap();

        assert!(doc.upgrade_paragraph_for_indent(keys[0]).unwrap());
        assert!(!doc.upgrade_paragraph_for_indent(keys[0]).unwrap());

        let Some(Block::Paragraph(p)) = doc.block(keys[0]) else {
            panic!("paragraph expected");
        };
        assert!(p.is_indentable());
        assert_eq!(p.format, ElementFormat::Center);
        assert_eq!(p.direction, Some(Direction::Rtl));
        assert_eq!(p.indent, 2);
        assert_eq!(p.children, vec![TextRun::plain("Summary")]);
        assert_eq!(doc.selection().unwrap().anchor, Caret { key: keys[0], offset: 3 });
    }

    #[test]
    fn test_failed_transaction_leaves_document_untouched() {
        let (mut doc, keys) = doc_with(&["a"]);
        let before = doc.clone();

        let err = doc
            .update(|tx| {
                tx.upgrade_paragraph_for_indent(keys[0])?;
                tx.set_paragraph_indent(NodeKey(999), ParagraphIndent::new(10.0, 0.0, 0.0))
            })
            .unwrap_err();

        assert_eq!(err, DocumentError::UnknownNode(NodeKey(999)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_plain_paragraph_rejects_direct_indent_write() {
        let (mut doc, keys) = doc_with(&["a"]);
        let err = doc
            .set_paragraph_indent(keys[0], ParagraphIndent::new(1.0, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, DocumentError::NotIndentable(keys[0]));
    }

    #[test]
    fn test_indent_host_on_heading_and_without_selection() {
        let mut doc = Document::new();
        let heading = doc.push_heading(1, "Jane Doe");
        let indent = ParagraphIndent::new(10.0, 0.0, 0.0);

        assert_eq!(doc.active_paragraph_indent(), None);
        assert_eq!(
            doc.write_active_paragraph_indent(indent).unwrap(),
            IndentWrite::NoSelection
        );

        doc.set_caret(heading, 0).unwrap();
        let version = doc.version();
        assert_eq!(doc.active_paragraph_indent(), Some(ParagraphIndent::ZERO));
        assert_eq!(
            doc.write_active_paragraph_indent(indent).unwrap(),
            IndentWrite::NotIndentable
        );
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_paragraph_break_inherits_indent_and_splits_graphemes() {
        let mut doc = Document::new();
        let key = doc.push_block(Block::Paragraph(Paragraph {
            key: NodeKey(0),
            capability: ParagraphCapability::Indentable(ParagraphIndent::new(24.0, -12.0, 8.0)),
            format: ElementFormat::Justify,
            indent: 0,
            direction: Some(Direction::Ltr),
            style: BlockStyle::default(),
            children: vec![TextRun::plain("Café 👩‍💻"), TextRun::link("site", "example.com")],
        }));
        // Caret after "Café " + the emoji sequence (a single grapheme).
        doc.set_caret(key, 6).unwrap();

        let new_key = doc.insert_paragraph_break().unwrap().unwrap();
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.block(key).unwrap().text(), "Café 👩‍💻");

        let Some(Block::Paragraph(next)) = doc.block(new_key) else {
            panic!("paragraph expected");
        };
        assert_eq!(
            next.capability,
            ParagraphCapability::Indentable(ParagraphIndent::new(24.0, -12.0, 8.0))
        );
        assert_eq!(next.format, ElementFormat::Justify);
        assert_eq!(next.children, vec![TextRun::link("site", "example.com")]);
        assert_eq!(doc.selection().unwrap().anchor, Caret { key: new_key, offset: 0 });
    }

    #[test]
    fn test_split_inside_run() {
        let mut runs = vec![TextRun::plain("hello"), TextRun::plain(" world")];
        let tail = split_runs_at(&mut runs, 3);
        assert_eq!(runs, vec![TextRun::plain("hel")]);
        assert_eq!(tail, vec![TextRun::plain("lo"), TextRun::plain(" world")]);

        let mut runs = vec![TextRun::plain("abc")];
        assert!(split_runs_at(&mut runs, 3).is_empty());
        assert_eq!(runs, vec![TextRun::plain("abc")]);
    }

    #[test]
    fn test_remove_block_moves_selection() {
        let (mut doc, keys) = doc_with(&["a", "b", "c"]);
        doc.set_caret(keys[2], 1).unwrap();
        doc.remove_block(keys[2]).unwrap();
        assert_eq!(doc.selection().unwrap().anchor, Caret { key: keys[1], offset: 0 });
        assert_eq!(doc.remove_block(keys[2]).unwrap_err(), DocumentError::UnknownNode(keys[2]));
    }

    #[test]
    fn test_selected_keys_in_document_order() {
        let (mut doc, keys) = doc_with(&["a", "b", "c"]);
        doc.select(
            Caret { key: keys[2], offset: 0 },
            Caret { key: keys[0], offset: 1 },
        )
        .unwrap();
        assert_eq!(doc.selected_keys(), keys);
    }
}
