//! Message types shared between adapters, brains and the orchestrator.

use serde::{Deserialize, Serialize};

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The human on the other end of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Channel address (e.g. "whatsapp:+15551234567" or "15551234567").
    pub address: String,
    /// Display name. Falls back to the address when the transport has none.
    pub name: String,
}

impl Sender {
    /// Create a sender, falling back to the address for a missing or blank name.
    pub fn new(address: impl Into<String>, name: Option<String>) -> Self {
        let address = address.into();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| address.clone());
        Self { address, name }
    }
}

/// Content type of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    /// Anything the relay does not interpret (stickers, locations, ...).
    Unsupported,
}

impl MessageKind {
    /// Classify a MIME type into a message kind.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.starts_with("image/") {
            Self::Image
        } else {
            Self::Unsupported
        }
    }
}

/// Reference to media attached to an inbound message.
///
/// `location` is whatever the transport needs to retrieve the bytes: a URL
/// for Twilio, a media ID for the Cloud API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// URL or transport media ID.
    pub location: String,
    /// MIME type, when the transport reports one.
    pub mime_type: Option<String>,
}

impl MediaRef {
    /// Create a media reference.
    pub fn new(location: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            location: location.into(),
            mime_type,
        }
    }
}

/// A normalized inbound message, independent of transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Who sent it.
    pub sender: Sender,
    /// Transport message ID, used for read receipts.
    pub message_id: Option<String>,
    /// Content type.
    pub kind: MessageKind,
    /// Text body or media caption.
    pub text: Option<String>,
    /// Attached media, if any.
    pub media: Option<MediaRef>,
}

impl InboundMessage {
    /// Create a text message.
    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            message_id: None,
            kind: MessageKind::Text,
            text: Some(text.into()),
            media: None,
        }
    }

    /// Create a voice note / audio message.
    pub fn audio(sender: Sender, media: MediaRef) -> Self {
        Self {
            sender,
            message_id: None,
            kind: MessageKind::Audio,
            text: None,
            media: Some(media),
        }
    }

    /// Create an image message with an optional caption.
    pub fn image(sender: Sender, media: MediaRef, caption: Option<String>) -> Self {
        Self {
            sender,
            message_id: None,
            kind: MessageKind::Image,
            text: caption,
            media: Some(media),
        }
    }

    /// Set the transport message ID.
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }
}
