#![warn(missing_docs)]
//! Page Ruler - Headless Margin and Indent Ruler Kernel
//!
//! # Overview
//!
//! `page-ruler` holds the state and math behind the rulers of a WYSIWYG page editor. It does not
//! render anything and never looks up DOM elements on its own: the host hands it a
//! [`PageSurface`] (layout reads and padding writes) and, for the paragraph ruler, an
//! [`IndentHost`] (document reads and transactional indent writes).
//!
//! # Core Features
//!
//! - **Page rulers**: horizontal (left/right) and vertical (top/bottom) margin dragging with
//!   clamping to `[0, 200]`
//! - **Indent ruler**: page margins plus per-paragraph left, first-line and right indents
//! - **Paragraph document**: blocks with a tagged paragraph capability and an atomic upgrade to
//!   the indent-capable variant
//! - **Presets and manual entry**: Normal/Narrow/Moderate/Wide and lenient numeric parsing
//! - **Text formatting**: font size, line height, paragraph spacing and horizontal rules
//! - **Geometry refresh**: one idempotent measurement shared by attach, resize, scroll and
//!   content-mutation triggers
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  PageEditor / IndentEditor                  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Rulers (page_ruler, indent_ruler)          │  ← Drag handling
//! ├─────────────────────────────────────────────┤
//! │  MarginController / Document                │  ← State owners
//! ├─────────────────────────────────────────────┤
//! │  DragState + Geometry snapshots             │  ← Pure math
//! ├─────────────────────────────────────────────┤
//! │  PageSurface / IndentHost                   │  ← Host capabilities
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use page_ruler::{MarginController, MarginSide, parse_margin_input};
//!
//! let mut margins = MarginController::default();
//! margins.set_margin(MarginSide::Right, parse_margin_input("116px"));
//! assert_eq!(margins.margins().right, 116.0);
//! ```
//!
//! See [`page_ruler`] for a full drag against a host surface and [`document`] for paragraph
//! indentation.
//!
//! # Module Description
//!
//! - [`geometry`] - Rectangles, clamping and pointer-to-margin transforms
//! - [`surface`] - Host capability traits
//! - [`margins`] - Margins, presets, manual entry and the margin owner
//! - [`drag`] - Pointer-capture drag sessions
//! - [`page_ruler`] - Page margin rulers and the page editor
//! - [`indent`] - Persisted paragraph indentation and inline styles
//! - [`document`] - Paragraph document model
//! - [`indent_ruler`] - Paragraph indent ruler and the indent editor
//! - [`format`] - Font size, line height, paragraph spacing and links
//! - [`export`] - HTML rendering for PDF/DOCX collaborators

pub mod config;
pub mod document;
pub mod drag;
pub mod error;
pub mod export;
pub mod format;
pub mod geometry;
pub mod indent;
pub mod indent_ruler;
pub mod margins;
pub mod page_ruler;
mod serialize;
pub mod surface;
pub mod ticks;

pub use config::{DEFAULT_INDENT_TOP_MARGIN, RulerConfig};
pub use document::{
    Block, BlockStyle, Caret, DEFAULT_RULE_THICKNESS, Direction, Document, ElementFormat, Heading,
    HorizontalRule, NodeKey, Paragraph, ParagraphCapability, Selection, TextRun, Transaction,
};
pub use drag::{DragSession, DragState, PointerId, PointerSample};
pub use error::{ConfigError, DocumentError, ExportError, RulerError};
pub use export::{ExportFormat, Exporter, export_document, render_html, render_page_html};
pub use format::{
    DEFAULT_FONT_SIZE, font_size_at_caret, normalize_href, parse_font_size,
    remove_paragraph_spacing, set_font_size, set_line_height, set_paragraph_spacing,
};
pub use geometry::{Axis, HorizontalGeometry, Rect, VerticalGeometry, clamp_px};
pub use indent::{InlineStyle, ParagraphIndent};
pub use indent_ruler::{
    IndentEditor, IndentMarker, IndentMarkerLayout, IndentRuler, IndentUpdate, TopMarginRuler,
};
pub use margins::{
    INDENT_RULER_MARGIN_MAX, MarginChange, MarginChangeCallback, MarginController, MarginPreset,
    MarginSide, Margins, PAGE_MARGIN_MAX, parse_margin_input,
};
pub use page_ruler::{HorizontalRuler, MarginUpdate, MarkerPositions, PageEditor, VerticalRuler};
pub use surface::{
    EdgeInsets, GeometryTrigger, IndentHost, IndentWrite, PageSurface, SurfaceMeasurement,
};
pub use ticks::{Tick, TickKind};
