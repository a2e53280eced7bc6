//! The single active pointer gesture.
//!
//! Pan, frame resize and content interaction are mutually exclusive, so they
//! live in one enum instead of independent flags.

use crate::error::{CanvasError, Result};
use crate::geometry::{Edges, Point, Rect, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    None,
    /// Drag-to-pan. Pan is recomputed from `start` on every move.
    Panning { origin: Point, start: ViewportState },
    /// Frame resize through a handle. Size is recomputed from `start` on every move.
    Resizing {
        edges: Edges,
        origin: Point,
        start: Rect,
    },
    /// Pointer input is passing through to the embedded content.
    ContentInteractive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Panning,
    Resizing,
    ContentInteractive,
}

impl Gesture {
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Gesture::None => None,
            Gesture::Panning { .. } => Some(GestureKind::Panning),
            Gesture::Resizing { .. } => Some(GestureKind::Resizing),
            Gesture::ContentInteractive => Some(GestureKind::ContentInteractive),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::None)
    }
}

/// Owner of the current gesture; refuses to start one over another.
#[derive(Debug, Default)]
pub struct GestureSlot {
    current: Gesture,
}

impl GestureSlot {
    pub fn current(&self) -> &Gesture {
        &self.current
    }

    pub fn begin(&mut self, gesture: Gesture) -> Result<()> {
        if let (Some(active), Some(requested)) = (self.current.kind(), gesture.kind()) {
            return Err(CanvasError::GestureConflict { active, requested });
        }
        self.current = gesture;
        Ok(())
    }

    /// End whatever gesture is active and hand it back.
    pub fn end(&mut self) -> Gesture {
        std::mem::take(&mut self.current)
    }
}
