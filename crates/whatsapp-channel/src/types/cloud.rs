//! Types for the WhatsApp Cloud API (Graph API).

use brain_core::{InboundMessage, MediaRef, MessageKind, Sender};
use serde::{Deserialize, Serialize};

/// Webhook notification envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEnvelope {
    /// Object type, "whatsapp_business_account" for message events.
    #[serde(default)]
    pub object: Option<String>,

    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

impl WebhookEnvelope {
    /// The first message in the first change, with the sender's profile name.
    ///
    /// Status-only notifications (delivered, read) carry no message.
    pub fn first_message(&self) -> Option<(&CloudMessage, Option<&str>)> {
        let value = &self.entry.first()?.changes.first()?.value;
        let message = value.messages.first()?;
        let name = value
            .contacts
            .first()
            .and_then(|c| c.profile.as_ref())
            .and_then(|p| p.name.as_deref());
        Some((message, name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub value: ChangeValue,
}

/// Payload of one change notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub contacts: Vec<Contact>,

    #[serde(default)]
    pub messages: Vec<CloudMessage>,

    /// Delivery status updates; not interpreted.
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub wa_id: Option<String>,

    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

/// An inbound message as delivered by the Cloud API.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudMessage {
    /// Sender's WhatsApp ID (phone number without "+").
    pub from: String,

    /// Message ID ("wamid.").
    pub id: String,

    /// Message type: text, image, audio, sticker, location, ...
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub text: Option<TextContent>,

    #[serde(default)]
    pub image: Option<MediaContent>,

    #[serde(default)]
    pub audio: Option<MediaContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub body: String,
}

/// Media attached to an inbound message.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaContent {
    /// Media ID, resolved to a download URL through the Graph API.
    pub id: String,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,
}

impl MediaContent {
    fn media_ref(&self) -> MediaRef {
        MediaRef::new(self.id.clone(), self.mime_type.clone())
    }
}

impl CloudMessage {
    /// Normalize into a transport-independent message.
    pub fn to_inbound(&self, profile_name: Option<&str>) -> InboundMessage {
        let sender = Sender::new(self.from.clone(), profile_name.map(str::to_string));

        let (kind, text, media) = match (self.kind.as_str(), &self.audio, &self.image) {
            ("text", _, _) => (
                MessageKind::Text,
                self.text.as_ref().map(|t| t.body.clone()),
                None,
            ),
            ("audio", Some(audio), _) => (MessageKind::Audio, None, Some(audio.media_ref())),
            ("image", _, Some(image)) => (
                MessageKind::Image,
                image.caption.clone(),
                Some(image.media_ref()),
            ),
            _ => (MessageKind::Unsupported, None, None),
        };

        InboundMessage {
            sender,
            message_id: Some(self.id.clone()),
            kind,
            text,
            media,
        }
    }
}

/// Outbound message request body.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage<'a> {
    pub messaging_product: &'static str,

    pub to: &'a str,

    #[serde(rename = "type")]
    pub kind: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPayload<'a>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload<'a>>,
}

impl<'a> OutboundMessage<'a> {
    /// A text message without link previews.
    pub fn text(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: Some(TextPayload {
                preview_url: false,
                body,
            }),
            image: None,
        }
    }

    /// An image message by public link.
    pub fn image(to: &'a str, link: &'a str, caption: Option<&'a str>) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "image",
            text: None,
            image: Some(ImagePayload { link, caption }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPayload<'a> {
    pub preview_url: bool,
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagePayload<'a> {
    pub link: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
}

/// Read receipt request body.
#[derive(Debug, Clone, Serialize)]
pub struct ReadReceipt<'a> {
    pub messaging_product: &'static str,
    pub status: &'static str,
    pub message_id: &'a str,
}

impl<'a> ReadReceipt<'a> {
    pub fn new(message_id: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            status: "read",
            message_id,
        }
    }
}

/// Response to a message send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<SentMessageId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessageId {
    pub id: String,
}

/// Media metadata returned for a media ID.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    /// Short-lived download URL (requires the bearer token).
    pub url: String,

    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Graph API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    pub message: String,

    #[serde(default)]
    pub code: Option<i64>,
}
