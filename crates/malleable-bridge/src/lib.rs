//! Bridge between the host and assistant-rendered content.
//!
//! Every content push is wrapped with a small script that exposes
//! `window.malleable.sendChat(text)` and listens for theme changes. Messages
//! in both directions use the tagged types in [`protocol`].

mod error;
pub mod inject;
pub mod protocol;
pub mod surface;

pub use error::{BridgeError, Result};
pub use inject::{BRIDGE_SNIPPET, Placement, inject};
pub use protocol::{ContentMessage, HostMessage};
pub use surface::{ContentHost, ContentSurface, SurfaceState};
