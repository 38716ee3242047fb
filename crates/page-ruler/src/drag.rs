//! Pointer-capture drag sessions.
//!
//! A ruler owns one [`DragState`]. Only one marker can hold the pointer capture at a time, so a
//! second `begin` while dragging is rejected instead of silently replacing the session.

use crate::error::RulerError;

/// Identifier of a pointer (mouse, pen or touch contact).
pub type PointerId = u32;

/// A pointer sample on the ruler's axis, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Pointer that produced the sample.
    pub pointer_id: PointerId,
    /// Client X coordinate.
    pub client_x: f64,
    /// Client Y coordinate.
    pub client_y: f64,
}

impl PointerSample {
    /// Sample from the primary pointer (id 1).
    pub fn at(client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id: 1,
            client_x,
            client_y,
        }
    }

    /// Same position, different pointer.
    pub fn with_pointer(mut self, pointer_id: PointerId) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

/// Transient state of one drag, from pointer-down to pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<K> {
    /// Marker being dragged.
    pub kind: K,
    /// Pointer holding the capture.
    pub pointer_id: PointerId,
    /// Pointer position (on the ruler's axis) at pointer-down.
    pub anchor_pointer: f64,
    /// Marker value at pointer-down.
    pub anchor_value: f64,
}

impl<K> DragSession<K> {
    /// Pointer travel since pointer-down.
    pub fn delta(&self, pointer: f64) -> f64 {
        pointer - self.anchor_pointer
    }
}

/// `idle -> dragging(kind) -> idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState<K> {
    /// No marker captured.
    #[default]
    Idle,
    /// A marker holds the pointer capture.
    Dragging(DragSession<K>),
}

impl<K: Copy + std::fmt::Debug> DragState<K> {
    /// Start a drag, capturing `pointer_id`.
    pub fn begin(
        &mut self,
        kind: K,
        pointer_id: PointerId,
        anchor_pointer: f64,
        anchor_value: f64,
    ) -> Result<DragSession<K>, RulerError> {
        if let DragState::Dragging(active) = self {
            return Err(RulerError::PointerAlreadyCaptured {
                active: active.pointer_id,
                requested: pointer_id,
            });
        }

        let session = DragSession {
            kind,
            pointer_id,
            anchor_pointer,
            anchor_value,
        };
        tracing::debug!(?kind, pointer_id, anchor_pointer, anchor_value, "drag started");
        *self = DragState::Dragging(session);
        Ok(session)
    }

    /// The active session, if the sample's pointer owns the capture.
    pub fn session_for(&self, pointer_id: PointerId) -> Option<DragSession<K>> {
        match self {
            DragState::Dragging(session) if session.pointer_id == pointer_id => Some(*session),
            _ => None,
        }
    }

    /// The active session regardless of pointer.
    pub fn active(&self) -> Option<DragSession<K>> {
        match self {
            DragState::Dragging(session) => Some(*session),
            DragState::Idle => None,
        }
    }

    /// Whether a marker is captured.
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    /// End the drag on pointer-up. Foreign pointers are ignored.
    pub fn end(&mut self, pointer_id: PointerId) -> Option<DragSession<K>> {
        let session = self.session_for(pointer_id)?;
        tracing::debug!(kind = ?session.kind, pointer_id, "drag ended");
        *self = DragState::Idle;
        Some(session)
    }

    /// The host reported `lostpointercapture`; same effect as pointer-up.
    pub fn release_capture(&mut self, pointer_id: PointerId) -> Option<DragSession<K>> {
        self.end(pointer_id)
    }
}
