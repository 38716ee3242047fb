//! Page margins, presets and manual entry.
//!
//! # Example
//!
//! ```rust
//! use page_ruler::{MarginController, MarginPreset, MarginSide, parse_margin_input};
//!
//! let mut controller = MarginController::default();
//! assert_eq!(controller.margins().left, 96.0);
//!
//! controller.subscribe(|change| {
//!     println!("{} -> {}px (v{})", change.side, change.new, change.version);
//! });
//!
//! // Values from the rulers and the manual-entry fields are clamped to [0, 200].
//! controller.set_margin(MarginSide::Left, 512.0);
//! assert_eq!(controller.margins().left, 200.0);
//!
//! controller.set_preset(MarginPreset::Narrow);
//! assert_eq!(controller.margins().top, 8.0);
//!
//! assert_eq!(parse_margin_input("abc"), 0.0);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::geometry::clamp_px;
use crate::surface::PageSurface;

/// Upper bound for page margins set through the page rulers and the margin control.
pub const PAGE_MARGIN_MAX: f64 = 200.0;

/// Upper bound for page margins set through the paragraph-indent ruler.
pub const INDENT_RULER_MARGIN_MAX: f64 = 300.0;

/// One inch at 96 DPI, the default page margin.
pub const DEFAULT_PAGE_MARGIN: f64 = 96.0;

/// A page edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginSide {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl MarginSide {
    /// All four sides in CSS shorthand order.
    pub const ALL: [MarginSide; 4] = [
        MarginSide::Top,
        MarginSide::Right,
        MarginSide::Bottom,
        MarginSide::Left,
    ];

    /// Lowercase name, as passed to `onMarginChange`.
    pub fn as_str(self) -> &'static str {
        match self {
            MarginSide::Top => "top",
            MarginSide::Right => "right",
            MarginSide::Bottom => "bottom",
            MarginSide::Left => "left",
        }
    }

    /// CSS padding property for this side.
    pub fn padding_property(self) -> &'static str {
        match self {
            MarginSide::Top => "padding-top",
            MarginSide::Right => "padding-right",
            MarginSide::Bottom => "padding-bottom",
            MarginSide::Left => "padding-left",
        }
    }
}

impl fmt::Display for MarginSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarginSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(MarginSide::Top),
            "right" => Ok(MarginSide::Right),
            "bottom" => Ok(MarginSide::Bottom),
            "left" => Ok(MarginSide::Left),
            other => Err(format!("unknown margin side `{}`", other)),
        }
    }
}

/// The four page margins, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margins {
    /// All four sides set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Value of `side`.
    pub fn get(&self, side: MarginSide) -> f64 {
        match side {
            MarginSide::Top => self.top,
            MarginSide::Right => self.right,
            MarginSide::Bottom => self.bottom,
            MarginSide::Left => self.left,
        }
    }

    /// Set `side` to `value` (unclamped).
    pub fn set(&mut self, side: MarginSide, value: f64) {
        match side {
            MarginSide::Top => self.top = value,
            MarginSide::Right => self.right = value,
            MarginSide::Bottom => self.bottom = value,
            MarginSide::Left => self.left = value,
        }
    }

    /// Copy with every side clamped to `[0, max]`.
    pub fn clamped(&self, max: f64) -> Self {
        Self {
            top: clamp_px(self.top, 0.0, max),
            right: clamp_px(self.right, 0.0, max),
            bottom: clamp_px(self.bottom, 0.0, max),
            left: clamp_px(self.left, 0.0, max),
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_PAGE_MARGIN)
    }
}

/// Named margin presets offered by the margin control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginPreset {
    /// 16px on every side.
    Normal,
    /// 8px on every side.
    Narrow,
    /// 24px on every side.
    Moderate,
    /// 32px on every side.
    Wide,
}

impl MarginPreset {
    /// Presets in menu order.
    pub const ALL: [MarginPreset; 4] = [
        MarginPreset::Normal,
        MarginPreset::Narrow,
        MarginPreset::Moderate,
        MarginPreset::Wide,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            MarginPreset::Normal => "Normal",
            MarginPreset::Narrow => "Narrow",
            MarginPreset::Moderate => "Moderate",
            MarginPreset::Wide => "Wide",
        }
    }

    /// The margin tuple this preset applies.
    pub fn margins(self) -> Margins {
        match self {
            MarginPreset::Normal => Margins::uniform(16.0),
            MarginPreset::Narrow => Margins::uniform(8.0),
            MarginPreset::Moderate => Margins::uniform(24.0),
            MarginPreset::Wide => Margins::uniform(32.0),
        }
    }
}

impl FromStr for MarginPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarginPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown margin preset `{}`", s))
    }
}

fn leading_integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern"))
}

/// Parse a manually typed margin value.
///
/// Reads the leading integer (optional sign, surrounding whitespace and trailing characters
/// ignored, fractions truncated). Anything without a leading integer becomes 0. The result is
/// clamped to `[0, PAGE_MARGIN_MAX]`.
pub fn parse_margin_input(input: &str) -> f64 {
    let value = leading_integer_regex()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    clamp_px(value, 0.0, PAGE_MARGIN_MAX)
}

/// A single committed margin change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginChange {
    /// Side that changed.
    pub side: MarginSide,
    /// Previous value.
    pub old: f64,
    /// New value.
    pub new: f64,
    /// Controller version after the change.
    pub version: u64,
}

/// Margin change callback type.
pub type MarginChangeCallback = Box<dyn FnMut(&MarginChange) + Send>;

/// Owner of the page margins (the editor container).
///
/// Every write is clamped to `[0, max]`. Writes that do not change a value are not reported.
pub struct MarginController {
    margins: Margins,
    max: f64,
    version: u64,
    callbacks: Vec<MarginChangeCallback>,
}

impl fmt::Debug for MarginController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarginController")
            .field("margins", &self.margins)
            .field("max", &self.max)
            .field("version", &self.version)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Default for MarginController {
    fn default() -> Self {
        Self::new(Margins::default(), PAGE_MARGIN_MAX)
    }
}

impl MarginController {
    /// Create a controller with `initial` margins (clamped) and upper bound `max`.
    pub fn new(initial: Margins, max: f64) -> Self {
        Self {
            margins: initial.clamped(max),
            max,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Current margins.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Upper bound for every side.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of committed changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a callback fired for every committed side change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&MarginChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Set one side. Returns the committed change, or `None` if the clamped value is unchanged.
    pub fn set_margin(&mut self, side: MarginSide, value: f64) -> Option<MarginChange> {
        let new = clamp_px(value, 0.0, self.max);
        let old = self.margins.get(side);
        if old == new {
            return None;
        }

        self.margins.set(side, new);
        self.version += 1;
        let change = MarginChange {
            side,
            old,
            new,
            version: self.version,
        };
        tracing::trace!(side = %side, old, new, version = self.version, "margin changed");
        for callback in &mut self.callbacks {
            callback(&change);
        }
        Some(change)
    }

    /// Handle `onMarginChange(side, value)`: clamp, store and push the padding to `surface`.
    pub fn handle_margin_change<S>(
        &mut self,
        surface: &mut S,
        side: MarginSide,
        value: f64,
    ) -> Option<MarginChange>
    where
        S: PageSurface + ?Sized,
    {
        let change = self.set_margin(side, value)?;
        surface.apply_margin(side, change.new);
        Some(change)
    }

    /// Replace all four sides. Returns the changes that were committed.
    pub fn set_margins(&mut self, margins: Margins) -> Vec<MarginChange> {
        MarginSide::ALL
            .into_iter()
            .filter_map(|side| self.set_margin(side, margins.get(side)))
            .collect()
    }

    /// Apply a named preset.
    pub fn set_preset(&mut self, preset: MarginPreset) -> Vec<MarginChange> {
        tracing::debug!(preset = preset.name(), "applying margin preset");
        self.set_margins(preset.margins())
    }

    /// Apply manually typed text for `side` (see [`parse_margin_input`]).
    pub fn set_manual_input(&mut self, side: MarginSide, input: &str) -> Option<MarginChange> {
        self.set_margin(side, parse_margin_input(input))
    }

    /// Push every side to `surface` as padding, regardless of change tracking.
    pub fn apply_all<S>(&self, surface: &mut S)
    where
        S: PageSurface + ?Sized,
    {
        for side in MarginSide::ALL {
            surface.apply_margin(side, self.margins.get(side));
        }
    }
}
