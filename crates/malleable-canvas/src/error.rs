//! Error types for the canvas controller.

use thiserror::Error;

use crate::gesture::GestureKind;

/// Result type for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur while driving the canvas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// A gesture was started while another one was still active.
    #[error("cannot start {requested:?} while {active:?} is active")]
    GestureConflict {
        active: GestureKind,
        requested: GestureKind,
    },

    /// A resize handle name did not describe a valid edge set.
    #[error("unknown resize handle: {0:?}")]
    UnknownHandle(String),

    /// Resize requested while the frame is not selected.
    #[error("frame must be selected before it can be resized")]
    NotSelected,
}
