//! Error types.
//!
//! Geometry reads never fail: a missing ruler or document element degrades to zero offsets.
//! The errors below cover the places where a caller asked for something that cannot happen
//! (a second pointer capture, an unknown node key, malformed JSON).

use thiserror::Error;

use crate::document::NodeKey;

#[derive(Debug, Error, Clone, PartialEq)]
/// Errors produced by ruler interactions.
pub enum RulerError {
    #[error("pointer {active} already holds the ruler capture (requested by pointer {requested})")]
    /// Another pointer already captured a marker on this ruler.
    PointerAlreadyCaptured {
        /// Pointer that currently owns the capture.
        active: u32,
        /// Pointer that tried to start a second drag.
        requested: u32,
    },

    #[error("marker {0} does not belong to this ruler")]
    /// A drag was requested for a marker kind the ruler does not render.
    UnsupportedMarker(&'static str),

    #[error(transparent)]
    /// Writing indent attributes into the document failed.
    Document(#[from] DocumentError),
}

#[derive(Debug, Error, Clone, PartialEq)]
/// Errors produced by the paragraph document model.
pub enum DocumentError {
    #[error("unknown node key {0}")]
    /// No block with this key exists.
    UnknownNode(NodeKey),

    #[error("node {key} is a {found}, expected a paragraph")]
    /// The block exists but cannot carry paragraph attributes.
    NotAParagraph {
        /// Offending node.
        key: NodeKey,
        /// Serialized type name of the node that was found.
        found: &'static str,
    },

    #[error("node {0} is not indent-capable")]
    /// Indent attributes were written to a plain paragraph without upgrading it first.
    NotIndentable(NodeKey),

    #[error("invalid font size `{0}`")]
    /// A font size that is not a positive number of points.
    InvalidFontSize(String),

    #[error("document JSON error: {0}")]
    /// Import/export failed.
    Json(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Json(err.to_string())
    }
}

#[derive(Debug, Error)]
/// Errors produced while loading a [`RulerConfig`](crate::RulerConfig).
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    /// JSON parsing failed.
    Json(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    /// A value parsed but is out of range.
    Invalid {
        /// Field name as it appears in JSON.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

#[derive(Debug, Error)]
/// Errors reported by export collaborators.
pub enum ExportError {
    #[error("export of `{filename}` failed: {message}")]
    /// The export was rejected, by the collaborator or for an unusable filename.
    Failed {
        /// Target filename.
        filename: String,
        /// Collaborator-provided message.
        message: String,
    },

    #[error("export JSON error: {0}")]
    /// A node could not be serialized.
    Json(#[from] serde_json::Error),
}
