//! Infinite canvas with a single content frame.
//!
//! [`CanvasController`] is the entry point: feed it pointer, wheel and key
//! events in viewport coordinates and apply the [`Action`]s it returns.

pub mod controller;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod interaction;
pub mod scene;
pub mod viewport;

pub use controller::{Action, CanvasController, Cursor};
pub use error::{CanvasError, Result};
pub use frame::{Frame, SelectionOutline};
pub use geometry::{Edges, Point, Rect, ViewportState};
pub use gesture::{Gesture, GestureKind};
pub use hit::{HitTester, HitTarget, Overlay};
pub use interaction::{InteractionMode, Listener, ModeTransition};
pub use scene::{KeyCode, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
