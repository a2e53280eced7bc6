//! Closed message protocol between the host and the content surface.
//!
//! Both directions are tagged by a `type` field. Anything that does not match
//! a known tag and shape is rejected at the boundary.

use malleable_config::Theme;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Messages posted by rendered content to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentMessage {
    /// Ask the host to send `text` as a user chat message.
    Chat { text: String },
}

/// Messages posted by the host into rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    Theme { theme: Theme },
}

const CONTENT_TAGS: &[&str] = &["chat"];

impl ContentMessage {
    /// Validate a raw posted value. Chat text is returned trimmed.
    pub fn from_value(value: Value) -> Result<Self> {
        let tag = value
            .as_object()
            .ok_or_else(|| BridgeError::Malformed("expected an object".into()))?
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::Malformed("missing string `type`".into()))?;
        if !CONTENT_TAGS.contains(&tag) {
            return Err(BridgeError::UnknownTag(tag.to_string()));
        }

        match serde_json::from_value(value)? {
            ContentMessage::Chat { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(BridgeError::EmptyText);
                }
                Ok(ContentMessage::Chat {
                    text: text.to_string(),
                })
            }
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }
}

impl HostMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
