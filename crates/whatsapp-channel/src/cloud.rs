//! WhatsApp Cloud API transport.

use std::time::Duration;

use async_trait::async_trait;
use brain_core::{InboundMessage, MediaData, MediaRef};
use orchestrator::{Channel, OrchestratorError};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::CloudConfig;
use crate::error::ChannelError;
use crate::types::{
    GraphErrorResponse, MediaInfo, OutboundMessage, ReadReceipt, SendResponse, WebhookEnvelope,
};

/// Client for the Graph API messages endpoint, usable as a relay [`Channel`].
#[derive(Clone)]
pub struct CloudChannel {
    http: Client,
    config: CloudConfig,
}

impl CloudChannel {
    /// Create a channel for the given configuration.
    pub fn new(config: CloudConfig) -> Result<Self, ChannelError> {
        if config.phone_number_id.is_empty() || config.access_token.is_empty() {
            return Err(ChannelError::Config(
                "phone number ID and access token are required".to_string(),
            ));
        }
        if config.verify_token.is_none() {
            warn!("WHATSAPP_VERIFY_TOKEN not set, webhook subscriptions will be refused");
        }

        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        info!(
            "Cloud API channel ready (phone number ID {}, {})",
            config.phone_number_id, config.api_version
        );

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Answer a webhook subscription handshake.
    ///
    /// Returns the challenge to echo when `mode` is "subscribe" and the
    /// token matches the configured verify token.
    pub fn verify_subscription(
        &self,
        mode: Option<&str>,
        token: Option<&str>,
        challenge: Option<&str>,
    ) -> Option<String> {
        let expected = self.config.verify_token.as_deref()?;
        match (mode, token, challenge) {
            (Some("subscribe"), Some(token), Some(challenge)) if token == expected => {
                info!("Webhook subscription verified");
                Some(challenge.to_string())
            }
            _ => {
                warn!("Webhook verification failed (mode: {:?})", mode);
                None
            }
        }
    }

    /// POST a JSON body to the messages endpoint.
    async fn post_message<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<SendResponse, ChannelError> {
        let response = self
            .http
            .post(self.config.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(body)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Send a text message. Returns the message ID when the API reports one.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<Option<String>, ChannelError> {
        let response = self.post_message(&OutboundMessage::text(to, body)).await?;
        let id = response.messages.into_iter().next().map(|m| m.id);
        debug!("Sent text to {} ({:?})", to, id);
        Ok(id)
    }

    /// Send an image by public link.
    pub async fn send_image_link(
        &self,
        to: &str,
        link: &str,
        caption: Option<&str>,
    ) -> Result<Option<String>, ChannelError> {
        let response = self
            .post_message(&OutboundMessage::image(to, link, caption))
            .await?;
        Ok(response.messages.into_iter().next().map(|m| m.id))
    }

    /// Mark an inbound message as read.
    pub async fn send_read_receipt(&self, message_id: &str) -> Result<(), ChannelError> {
        self.post_message(&ReadReceipt::new(message_id)).await?;
        debug!("Marked {} as read", message_id);
        Ok(())
    }

    /// Resolve a media ID and download its bytes.
    pub async fn download(&self, media_id: &str) -> Result<MediaData, ChannelError> {
        let response = self
            .http
            .get(self.config.media_url(media_id))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let info: MediaInfo = check(response).await?.json().await?;

        let response = self
            .http
            .get(&info.url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let bytes = check(response).await?.bytes().await?.to_vec();

        let mime = info
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(MediaData::new(bytes, mime))
    }
}

/// Return the response if it succeeded, otherwise the Graph API error.
async fn check(response: Response) -> Result<Response, ChannelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GraphErrorResponse>(&text)
        .map(|e| e.error.message)
        .unwrap_or(text);

    Err(ChannelError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Channel for CloudChannel {
    fn name(&self) -> &str {
        "cloud"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        let envelope: WebhookEnvelope =
            serde_json::from_slice(body).map_err(|e| ChannelError::InvalidPayload(e.to_string()))?;

        Ok(envelope
            .first_message()
            .map(|(message, name)| message.to_inbound(name)))
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), OrchestratorError> {
        self.send_message(to, text).await?;
        Ok(())
    }

    async fn send_image(
        &self,
        to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        self.send_image_link(to, image_url, caption).await?;
        Ok(())
    }

    async fn mark_read(&self, message_id: &str) -> Result<(), OrchestratorError> {
        self.send_read_receipt(message_id).await?;
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        self.download(&media.location)
            .await
            .map_err(|e| OrchestratorError::MediaUnavailable(e.to_string()))
    }
}
