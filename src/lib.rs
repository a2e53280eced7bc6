//! Malleable: chat with an assistant that renders live content onto an
//! infinite canvas.
//!
//! The [`App`] host composes the canvas controller, the content bridge and
//! the stream session; [`Shell`] connects it to a window.

pub mod app;
pub mod host;
pub mod layout;
pub mod loopback;
pub mod shell;
pub mod view;
pub mod workdir;

pub use app::{App, Effect};
pub use host::LogHost;
pub use layout::{ZoneId, ZoneLayout, clamp_panel_width};
pub use loopback::LoopbackAssistant;
pub use shell::Shell;
pub use workdir::{CwdIndicator, shorten_home};
