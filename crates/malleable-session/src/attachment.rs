//! Image attachments queued in the chat input until the next send.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Attachment {
    /// Only `image/*` types are accepted.
    pub fn image(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(SessionError::UnsupportedAttachment(mime_type));
        }
        Ok(Self { data, mime_type })
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL for thumbnails.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

#[derive(Debug, Default)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
}

impl PendingAttachments {
    pub fn push(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    /// Remove the attachment at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Move every queued attachment out, leaving the queue empty.
    pub fn take(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A send is possible with non-blank text or at least one attachment.
    pub fn can_send(&self, draft: &str) -> bool {
        !draft.trim().is_empty() || !self.items.is_empty()
    }
}
