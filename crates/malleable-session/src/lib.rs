//! Conversation mirror and streaming turn controller.
//!
//! The external assistant owns the canonical conversation. This crate keeps
//! the display-oriented projection of it and drives it from the assistant's
//! push events.

mod error;

pub mod assistant;
pub mod attachment;
pub mod message;
pub mod session;
pub mod tool;

pub use assistant::{Assistant, DirectoryPick, PushEvent};
pub use attachment::{Attachment, PendingAttachments};
pub use error::{AssistantError, Result, SessionError};
pub use message::{ContentPart, Message, Role, TextStyle};
pub use session::{ABORT_TIMEOUT_MESSAGE, Phase, SendOutcome, StreamSession};
pub use tool::{ToolIndicator, ToolStatus, summarize_args};
