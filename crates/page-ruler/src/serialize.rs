//! JSON export/import of the paragraph document.
//!
//! The layout follows the usual editor-state shape:
//!
//! ```json
//! { "root": { "type": "root", "version": 1, "children": [
//!     { "type": "ruler-paragraph", "version": 1, "format": "", "indent": 0, "direction": null,
//!       "paddingLeft": 24.0, "textIndent": -12.0, "paddingRight": 8.0,
//!       "children": [{ "text": "..." }] }
//! ] } }
//! ```
//!
//! Horizontal rules export as `{ "type": "horizontalrule", "thickness": "1px", "version": 1 }`.
//!
//! Node keys are not exported; import assigns fresh ones. Indent fields missing from a
//! `ruler-paragraph` import as 0, and a rule without `thickness` imports with the default.

use serde::{Deserialize, Serialize};

use crate::document::{
    Block, BlockStyle, DEFAULT_RULE_THICKNESS, Direction, Document, ElementFormat, Heading,
    HorizontalRule, NodeKey, Paragraph, ParagraphCapability, TextRun,
};
use crate::error::{DocumentError, ExportError};
use crate::indent::ParagraphIndent;

const NODE_VERSION: u32 = 1;

fn node_version() -> u32 {
    NODE_VERSION
}

fn rule_thickness() -> String {
    DEFAULT_RULE_THICKNESS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedElement {
    #[serde(default)]
    children: Vec<TextRun>,
    #[serde(default)]
    format: ElementFormat,
    #[serde(default)]
    indent: u32,
    #[serde(default)]
    direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    margin_top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    margin_bottom: Option<String>,
    #[serde(default = "node_version")]
    version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedRulerParagraph {
    #[serde(flatten)]
    element: SerializedElement,
    #[serde(default)]
    padding_left: f64,
    #[serde(default)]
    text_indent: f64,
    #[serde(default)]
    padding_right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SerializedHeading {
    tag: String,
    #[serde(flatten)]
    element: SerializedElement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SerializedHorizontalRule {
    #[serde(default = "rule_thickness")]
    thickness: String,
    #[serde(default = "node_version")]
    version: u32,
}

/// One serialized block, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
enum SerializedBlock {
    #[serde(rename = "paragraph")]
    Paragraph(SerializedElement),
    #[serde(rename = "ruler-paragraph")]
    RulerParagraph(SerializedRulerParagraph),
    #[serde(rename = "heading")]
    Heading(SerializedHeading),
    #[serde(rename = "horizontalrule")]
    HorizontalRule(SerializedHorizontalRule),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SerializedRoot {
    children: Vec<SerializedBlock>,
    #[serde(rename = "type", default = "root_type")]
    node_type: String,
    #[serde(default = "node_version")]
    version: u32,
}

fn root_type() -> String {
    "root".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SerializedDocument {
    root: SerializedRoot,
}

fn element_of(
    children: &[TextRun],
    format: ElementFormat,
    indent: u32,
    direction: Option<Direction>,
    style: &BlockStyle,
) -> SerializedElement {
    SerializedElement {
        children: children.to_vec(),
        format,
        indent,
        direction,
        line_height: style.line_height.clone(),
        margin_top: style.margin_top.clone(),
        margin_bottom: style.margin_bottom.clone(),
        version: NODE_VERSION,
    }
}

fn style_of(element: &SerializedElement) -> BlockStyle {
    BlockStyle {
        line_height: element.line_height.clone(),
        margin_top: element.margin_top.clone(),
        margin_bottom: element.margin_bottom.clone(),
    }
}

impl SerializedBlock {
    fn from_block(block: &Block) -> Self {
        match block {
            Block::Paragraph(p) => {
                let element = element_of(&p.children, p.format, p.indent, p.direction, &p.style);
                match p.capability {
                    ParagraphCapability::Plain => SerializedBlock::Paragraph(element),
                    ParagraphCapability::Indentable(indent) => {
                        SerializedBlock::RulerParagraph(SerializedRulerParagraph {
                            element,
                            padding_left: indent.padding_left,
                            text_indent: indent.text_indent,
                            padding_right: indent.padding_right,
                        })
                    }
                }
            }
            Block::Heading(h) => SerializedBlock::Heading(SerializedHeading {
                tag: format!("h{}", h.level),
                element: element_of(&h.children, h.format, 0, h.direction, &h.style),
            }),
            Block::HorizontalRule(r) => SerializedBlock::HorizontalRule(SerializedHorizontalRule {
                thickness: r.thickness.clone(),
                version: NODE_VERSION,
            }),
        }
    }

    fn into_block(self, key: NodeKey) -> Block {
        let paragraph = |element: SerializedElement, capability| {
            Block::Paragraph(Paragraph {
                key,
                capability,
                format: element.format,
                indent: element.indent,
                direction: element.direction,
                style: style_of(&element),
                children: element.children,
            })
        };

        match self {
            SerializedBlock::Paragraph(element) => paragraph(element, ParagraphCapability::Plain),
            SerializedBlock::RulerParagraph(ruler) => paragraph(
                ruler.element,
                ParagraphCapability::Indentable(ParagraphIndent::new(
                    ruler.padding_left,
                    ruler.text_indent,
                    ruler.padding_right,
                )),
            ),
            SerializedBlock::Heading(heading) => {
                let level = heading
                    .tag
                    .strip_prefix('h')
                    .and_then(|n| n.parse::<u8>().ok())
                    .unwrap_or(1)
                    .clamp(1, 3);
                Block::Heading(Heading {
                    key,
                    level,
                    format: heading.element.format,
                    direction: heading.element.direction,
                    style: style_of(&heading.element),
                    children: heading.element.children,
                })
            }
            SerializedBlock::HorizontalRule(rule) => Block::HorizontalRule(HorizontalRule {
                key,
                thickness: rule.thickness,
            }),
        }
    }
}

impl Block {
    /// Export this block as a JSON node.
    pub fn export_json(&self) -> Result<serde_json::Value, ExportError> {
        Ok(serde_json::to_value(SerializedBlock::from_block(self))?)
    }

    /// Import a JSON node, giving it `key`.
    pub fn import_json(value: serde_json::Value, key: NodeKey) -> Result<Block, DocumentError> {
        let node: SerializedBlock = serde_json::from_value(value)?;
        Ok(node.into_block(key))
    }
}

impl Document {
    /// Export the whole document.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let doc = SerializedDocument {
            root: SerializedRoot {
                children: self.blocks().iter().map(SerializedBlock::from_block).collect(),
                node_type: root_type(),
                version: NODE_VERSION,
            },
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Import a document exported by [`Document::to_json`]. The selection is cleared.
    pub fn from_json(json: &str) -> Result<Document, DocumentError> {
        let parsed: SerializedDocument = serde_json::from_str(json)?;
        let mut doc = Document::new();
        for node in parsed.root.children {
            // The key is replaced by `push_block`.
            doc.push_block(node.into_block(NodeKey(0)));
        }
        Ok(doc)
    }
}
