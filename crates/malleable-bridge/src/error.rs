//! Error types for the content bridge.

use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur at the host/content boundary.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Payload was not a JSON object with a string `type` tag.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// `type` tag is not part of the protocol.
    #[error("unknown message type: {0:?}")]
    UnknownTag(String),

    /// Chat message carried no usable text.
    #[error("chat message text is empty")]
    EmptyText,

    /// Payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content host failed to load or deliver.
    #[error("content host error: {0}")]
    Host(String),
}
