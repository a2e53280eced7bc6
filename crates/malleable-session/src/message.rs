//! Display-oriented mirror of the conversation.

use crate::attachment::Attachment;
use crate::tool::ToolIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text { text: String, style: TextStyle },
    Image(Attachment),
    Tool(ToolIndicator),
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Message {
    pub fn user(text: &str, images: Vec<Attachment>) -> Self {
        let mut content = Vec::with_capacity(images.len() + 1);
        if !text.is_empty() {
            content.push(ContentPart::Text {
                text: text.to_string(),
                style: TextStyle::Normal,
            });
        }
        content.extend(images.into_iter().map(ContentPart::Image));
        Self {
            role: Role::User,
            content,
        }
    }

    pub fn assistant() -> Self {
        Self {
            role: Role::Assistant,
            content: Vec::new(),
        }
    }

    /// All text parts joined, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolIndicator> {
        self.content.iter().filter_map(|part| match part {
            ContentPart::Tool(tool) => Some(tool),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &Attachment> {
        self.content.iter().filter_map(|part| match part {
            ContentPart::Image(image) => Some(image),
            _ => None,
        })
    }
}
