//! Ruler configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::DEFAULT_DOCUMENT_WIDTH;
use crate::margins::{INDENT_RULER_MARGIN_MAX, Margins, PAGE_MARGIN_MAX};

/// Default top margin of the paragraph-indent editor's vertical ruler.
pub const DEFAULT_INDENT_TOP_MARGIN: f64 = 40.0;

/// Tunables shared by the rulers.
///
/// Every field has a default, so a JSON config only needs the values it overrides:
///
/// ```rust
/// use page_ruler::RulerConfig;
///
/// let config = RulerConfig::from_json_str(r#"{ "page_margin_max": 150 }"#).unwrap();
/// assert_eq!(config.page_margin_max, 150.0);
/// assert_eq!(config.dpi, 96.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerConfig {
    /// Pixels per inch.
    pub dpi: f64,
    /// Upper bound for the page rulers and the margin control.
    pub page_margin_max: f64,
    /// Upper bound for page margins dragged on the paragraph-indent ruler.
    pub indent_margin_max: f64,
    /// Margins applied when the page editor mounts.
    pub default_margins: Margins,
    /// Top margin applied when the paragraph-indent editor mounts.
    pub default_indent_top_margin: f64,
    /// Document width assumed until the first measurement.
    pub default_document_width: f64,
    /// Number of inch marks on the horizontal page ruler.
    pub horizontal_inch_marks: usize,
    /// Number of inch marks on the vertical page ruler.
    pub vertical_inch_marks: usize,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            page_margin_max: PAGE_MARGIN_MAX,
            indent_margin_max: INDENT_RULER_MARGIN_MAX,
            default_margins: Margins::default(),
            default_indent_top_margin: DEFAULT_INDENT_TOP_MARGIN,
            default_document_width: DEFAULT_DOCUMENT_WIDTH,
            horizontal_inch_marks: 19,
            vertical_inch_marks: 21,
        }
    }
}

impl RulerConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RulerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dpi", self.dpi)?;
        positive("page_margin_max", self.page_margin_max)?;
        positive("indent_margin_max", self.indent_margin_max)?;
        positive("default_document_width", self.default_document_width)?;
        non_negative("default_indent_top_margin", self.default_indent_top_margin)?;
        for (field, value) in [
            ("default_margins.top", self.default_margins.top),
            ("default_margins.right", self.default_margins.right),
            ("default_margins.bottom", self.default_margins.bottom),
            ("default_margins.left", self.default_margins.left),
        ] {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {}", value),
        })
    }
}
