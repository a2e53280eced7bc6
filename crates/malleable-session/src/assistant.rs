//! Interface of the external assistant.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::attachment::Attachment;
use crate::error::AssistantError;

/// Events pushed asynchronously by the assistant while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    TextDelta(String),
    ToolStart { name: String, args: Value },
    ToolEnd { name: String, is_error: bool },
    /// New markup for the content surface.
    Render(String),
    /// Terminal: the turn finished with this final text.
    Done(String),
    /// Terminal: the turn failed.
    Error(String),
}

impl PushEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PushEvent::Done(_) | PushEvent::Error(_))
    }
}

/// Result of a working-directory picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryPick {
    Canceled,
    Picked(PathBuf),
}

/// Request/response operations offered by the assistant. Results of a turn
/// arrive separately as [`PushEvent`]s.
pub trait Assistant {
    /// Start a turn, or steer the running one.
    fn send(&mut self, text: &str, images: &[Attachment]) -> Result<(), AssistantError>;

    /// Ask the running turn to stop. Best effort.
    fn abort(&mut self);

    /// Reset the assistant's conversation log.
    fn clear(&mut self);

    fn working_directory(&self) -> PathBuf;

    fn set_working_directory(&mut self, path: &Path) -> Result<(), AssistantError>;
}
