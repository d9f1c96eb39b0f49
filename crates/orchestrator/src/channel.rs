//! Messaging channel trait and implementations.

use async_trait::async_trait;
use brain_core::{InboundMessage, MediaData, MediaRef};

use crate::error::OrchestratorError;

/// A messaging transport: parses webhooks and delivers replies.
///
/// Abstracted to support different transports (Twilio, Cloud API, tests).
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get a human-readable name for this channel.
    fn name(&self) -> &str;

    /// Normalize a raw webhook body.
    ///
    /// Returns `Ok(None)` for payloads that carry no user message (status
    /// updates, unsupported events).
    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError>;

    /// Send a text message.
    ///
    /// # Arguments
    /// * `to` - Channel address of the recipient
    /// * `text` - Message content
    async fn send_text(&self, to: &str, text: &str) -> Result<(), OrchestratorError>;

    /// Send an image by URL with an optional caption.
    ///
    /// Default implementation sends the URL as text.
    async fn send_image(
        &self,
        to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        let _ = caption;
        self.send_text(to, image_url).await
    }

    /// Mark an inbound message as read.
    ///
    /// Default implementation does nothing.
    async fn mark_read(&self, message_id: &str) -> Result<(), OrchestratorError> {
        let _ = message_id;
        Ok(())
    }

    /// Download the bytes behind a media reference.
    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError>;
}

/// Parse a body holding an [`InboundMessage`] as JSON.
///
/// Empty bodies and JSON that is not a message yield `Ok(None)`.
fn parse_canonical(body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<InboundMessage>(body) {
        Ok(message) => Ok(Some(message)),
        Err(err) if err.is_data() => Ok(None),
        Err(err) => Err(OrchestratorError::InvalidPayload(err.to_string())),
    }
}

/// A no-op channel for testing that discards all messages.
///
/// Accepts canonical `InboundMessage` JSON bodies.
#[derive(Debug, Clone, Default)]
pub struct NoOpChannel;

#[async_trait]
impl Channel for NoOpChannel {
    fn name(&self) -> &str {
        "noop"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        parse_canonical(body)
    }

    async fn send_text(&self, _to: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        Err(OrchestratorError::MediaUnavailable(format!(
            "noop channel cannot fetch {}",
            media.location
        )))
    }
}

/// A logging channel for debugging that logs all operations.
///
/// Accepts canonical `InboundMessage` JSON bodies.
#[derive(Debug, Clone, Default)]
pub struct LoggingChannel;

#[async_trait]
impl Channel for LoggingChannel {
    fn name(&self) -> &str {
        "logging"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        let parsed = parse_canonical(body)?;
        tracing::info!("[logging] Parsed inbound message: {:?}", parsed);
        Ok(parsed)
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("[logging] Sending message to {}: {}", to, text);
        Ok(())
    }

    async fn send_image(
        &self,
        to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        tracing::info!(
            "[logging] Sending image to {}: {} ({})",
            to,
            image_url,
            caption.unwrap_or("no caption")
        );
        Ok(())
    }

    async fn mark_read(&self, message_id: &str) -> Result<(), OrchestratorError> {
        tracing::info!("[logging] Marking {} as read", message_id);
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        tracing::info!("[logging] Cannot fetch media {}", media.location);
        Err(OrchestratorError::MediaUnavailable(media.location.clone()))
    }
}
