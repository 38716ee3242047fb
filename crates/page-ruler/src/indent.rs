//! Paragraph indentation attributes and inline styles.
//!
//! An indent-capable paragraph persists three numbers:
//!
//! - `paddingLeft`: absolute left indent (px)
//! - `textIndent`: first-line offset **relative to** `paddingLeft` (px, may be negative)
//! - `paddingRight`: absolute right indent (px)
//!
//! The first-line marker therefore sits at `paddingLeft + textIndent` on the ruler.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Persisted paragraph indentation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphIndent {
    /// Absolute left indent.
    #[serde(default)]
    pub padding_left: f64,
    /// First-line offset relative to `padding_left`.
    #[serde(default)]
    pub text_indent: f64,
    /// Absolute right indent.
    #[serde(default)]
    pub padding_right: f64,
}

impl ParagraphIndent {
    /// No indentation.
    pub const ZERO: ParagraphIndent = ParagraphIndent {
        padding_left: 0.0,
        text_indent: 0.0,
        padding_right: 0.0,
    };

    /// Create from the persisted triple.
    pub const fn new(padding_left: f64, text_indent: f64, padding_right: f64) -> Self {
        Self {
            padding_left,
            text_indent,
            padding_right,
        }
    }

    /// Build from absolute ruler marker positions.
    pub fn from_markers(left: f64, first_line: f64, right: f64) -> Self {
        Self::new(left, first_line - left, right)
    }

    /// Absolute position of the first-line marker.
    pub fn first_line_position(&self) -> f64 {
        self.padding_left + self.text_indent
    }

    /// Whether all three values are zero.
    pub fn is_zero(&self) -> bool {
        self.padding_left == 0.0 && self.text_indent == 0.0 && self.padding_right == 0.0
    }

    /// Inline style for the paragraph element. Zero values emit no property.
    pub fn to_style(&self) -> InlineStyle {
        let mut style = InlineStyle::default();
        self.write_style(&mut style);
        style
    }

    /// Update the three indent properties on an existing style, removing zero ones.
    pub fn write_style(&self, style: &mut InlineStyle) {
        style.set_px_or_remove("padding-left", self.padding_left);
        style.set_px_or_remove("text-indent", self.text_indent);
        style.set_px_or_remove("padding-right", self.padding_right);
    }

    /// Read the three indent properties from a style; absent ones are 0.
    pub fn from_style(style: &InlineStyle) -> Self {
        Self::new(
            style.get_px("padding-left").unwrap_or(0.0),
            style.get_px("text-indent").unwrap_or(0.0),
            style.get_px("padding-right").unwrap_or(0.0),
        )
    }
}

/// Format a pixel value the way CSS serializers do (`24px`, `-12.5px`).
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*([A-Za-z-]+)\s*:\s*([^;]*?)\s*(?:;|$)").expect("declaration pattern")
    })
}

fn px_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))(?:px)?$").expect("px pattern"))
}

/// An ordered list of CSS declarations, as found in a `style` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse `name: value; ...`. Later duplicates replace earlier ones.
    pub fn parse(style: &str) -> Self {
        let mut parsed = InlineStyle::default();
        for caps in declaration_regex().captures_iter(style) {
            let name = caps[1].to_ascii_lowercase();
            let value = caps[2].to_string();
            if !value.is_empty() {
                parsed.set(&name, value);
            }
        }
        parsed
    }

    /// Raw value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric value of `name` in px (a bare number is accepted as px).
    pub fn get_px(&self, name: &str) -> Option<f64> {
        let value = self.get(name)?;
        let caps = px_regex().captures(value.trim())?;
        caps[1].parse().ok()
    }

    /// Set `name`, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((name.to_string(), value)),
        }
    }

    /// Set `name` to `value`px.
    pub fn set_px(&mut self, name: &str, value: f64) {
        self.set(name, format_px(value));
    }

    /// Set `name` to `value`px, or remove it when `value` is 0.
    pub fn set_px_or_remove(&mut self, name: &str, value: f64) {
        if value == 0.0 {
            self.remove(name);
        } else {
            self.set_px(name, value);
        }
    }

    /// Remove `name`.
    pub fn remove(&mut self, name: &str) {
        self.declarations.retain(|(n, _)| n != name);
    }

    /// Whether no declarations are present.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialize back to `name: value; name: value`.
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{}: {}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
