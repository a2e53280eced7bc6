use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Failures reported synchronously by the external assistant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("assistant rejected the message: {0}")]
    Rejected(String),

    #[error("{0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A turn is already streaming and the send policy rejects new sends.
    #[error("assistant is already processing")]
    Busy,

    /// Nothing to send: blank text and no attachments.
    #[error("message is empty")]
    Empty,

    #[error("unsupported attachment type: {0}")]
    UnsupportedAttachment(String),

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}
