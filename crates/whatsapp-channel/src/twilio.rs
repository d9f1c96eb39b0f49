//! Twilio WhatsApp transport.

use std::time::Duration;

use async_trait::async_trait;
use brain_core::{InboundMessage, MediaData, MediaRef};
use orchestrator::{Channel, OrchestratorError};
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::config::TwilioConfig;
use crate::error::ChannelError;
use crate::types::{whatsapp_address, TwilioErrorResponse, TwilioMessage, TwilioWebhook};

/// Client for Twilio's Messages API, usable as a relay [`Channel`].
///
/// Webhooks arrive form-encoded. Replies are created through the REST API
/// with basic auth; media URLs are fetched with the same credentials.
/// Twilio has no read receipts for WhatsApp, so `mark_read` is a no-op.
#[derive(Clone)]
pub struct TwilioChannel {
    http: Client,
    config: TwilioConfig,
}

impl TwilioChannel {
    /// Create a channel for the given configuration.
    pub fn new(config: TwilioConfig) -> Result<Self, ChannelError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(ChannelError::Config(
                "Twilio account SID and auth token are required".to_string(),
            ));
        }

        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        info!(
            "Twilio channel ready (from whatsapp:{})",
            config.whatsapp_number.trim_start_matches("whatsapp:")
        );

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }

    /// Create a message. `media_url` attaches an image by link.
    pub async fn create_message(
        &self,
        to: &str,
        body: Option<&str>,
        media_url: Option<&str>,
    ) -> Result<TwilioMessage, ChannelError> {
        let from = whatsapp_address(&self.config.whatsapp_number);
        let to = whatsapp_address(to);

        let mut form: Vec<(&str, &str)> = vec![("From", from.as_str()), ("To", to.as_str())];
        if let Some(body) = body {
            form.push(("Body", body));
        }
        if let Some(url) = media_url {
            form.push(("MediaUrl", url));
        }

        debug!("Twilio send to {} ({} fields)", to, form.len());

        let response = self
            .http
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let message: TwilioMessage = check(response).await?.json().await?;
        debug!("Twilio message {} ({:?})", message.sid, message.status);
        Ok(message)
    }

    /// Download media from a Twilio media URL.
    pub async fn download(&self, url: &str) -> Result<(Vec<u8>, Option<String>), ChannelError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        let response = check(response).await?;

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok((bytes, mime))
    }
}

/// Return the response if it succeeded, otherwise the Twilio error.
async fn check(response: Response) -> Result<Response, ChannelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<TwilioErrorResponse>(&text)
        .map(|e| match e.code {
            Some(code) => format!("{} (code {})", e.message, code),
            None => e.message,
        })
        .unwrap_or(text);

    Err(ChannelError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Channel for TwilioChannel {
    fn name(&self) -> &str {
        "twilio"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        match TwilioWebhook::from_form(body) {
            Some(webhook) => Ok(Some(webhook.to_inbound())),
            None => Err(ChannelError::InvalidPayload("missing From field".to_string()).into()),
        }
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), OrchestratorError> {
        self.create_message(to, Some(text), None).await?;
        Ok(())
    }

    async fn send_image(
        &self,
        to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        self.create_message(to, caption, Some(image_url)).await?;
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        let (bytes, mime) = self
            .download(&media.location)
            .await
            .map_err(|e| OrchestratorError::MediaUnavailable(e.to_string()))?;

        let mime = media
            .mime_type
            .clone()
            .or(mime)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(MediaData::new(bytes, mime))
    }
}
