//! Types for Twilio's WhatsApp API.

use brain_core::{InboundMessage, MediaRef, MessageKind, Sender};
use serde::Deserialize;

/// Prefix Twilio puts on WhatsApp addresses.
pub const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Fields of an incoming-message webhook (form-encoded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwilioWebhook {
    /// Sender address, e.g. "whatsapp:+15551234567".
    pub from: String,
    pub profile_name: Option<String>,
    pub body: Option<String>,
    pub message_sid: Option<String>,
    pub num_media: u32,
    pub media_url: Option<String>,
    pub media_content_type: Option<String>,
}

impl TwilioWebhook {
    /// Parse a form-encoded webhook body.
    ///
    /// Returns `None` when the body has no `From` field.
    pub fn from_form(body: &[u8]) -> Option<Self> {
        let mut webhook = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.into_owned();
            match key.as_ref() {
                "From" => webhook.from = value,
                "ProfileName" => webhook.profile_name = Some(value),
                "Body" => webhook.body = Some(value),
                "MessageSid" => webhook.message_sid = Some(value),
                "NumMedia" => webhook.num_media = value.parse().unwrap_or(0),
                "MediaUrl0" => webhook.media_url = Some(value),
                "MediaContentType0" => webhook.media_content_type = Some(value),
                _ => {}
            }
        }

        if webhook.from.is_empty() {
            None
        } else {
            Some(webhook)
        }
    }

    /// Normalize into a transport-independent message.
    pub fn to_inbound(&self) -> InboundMessage {
        let sender = Sender::new(self.from.clone(), self.profile_name.clone());
        let body = self.body.clone().filter(|b| !b.is_empty());

        let media = match (&self.media_url, self.num_media) {
            (Some(url), n) if n > 0 => Some(MediaRef::new(url.clone(), self.media_content_type.clone())),
            _ => None,
        };

        let (kind, text) = match &media {
            None => (MessageKind::Text, body),
            Some(media) => {
                let kind = media
                    .mime_type
                    .as_deref()
                    .map(MessageKind::from_mime)
                    .unwrap_or(MessageKind::Unsupported);
                match kind {
                    // Audio carries no caption; the transcript replaces it
                    MessageKind::Audio => (kind, None),
                    _ => (kind, body),
                }
            }
        };

        InboundMessage {
            sender,
            message_id: self.message_sid.clone(),
            kind,
            text,
            media,
        }
    }
}

/// Add the WhatsApp prefix to an address unless it already has it.
pub fn whatsapp_address(address: &str) -> String {
    if address.starts_with(WHATSAPP_PREFIX) {
        address.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, address)
    }
}

/// Response to a message creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioMessage {
    pub sid: String,

    #[serde(default)]
    pub status: Option<String>,
}

/// Twilio error response.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,

    pub message: String,
}
