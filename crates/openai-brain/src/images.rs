//! DALL-E image generation client.

use brain_core::{async_trait, BrainError, ImageGenerator};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::config::OpenAiConfig;
use crate::http::{build_client, ensure_success, network_error};

/// Generates images through the `/images/generations` endpoint.
pub struct DalleImageGenerator {
    client: Client,
    config: OpenAiConfig,
}

impl DalleImageGenerator {
    /// Create a new image generator.
    pub fn new(config: OpenAiConfig) -> Result<Self, BrainError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageGenerator for DalleImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BrainError> {
        if self.config.media_api_key.is_empty() {
            return Err(BrainError::Configuration(
                "OPENAI_API_KEY not set; image generation unavailable".to_string(),
            ));
        }

        let url = format!("{}/images/generations", self.config.media_api_url);
        let request = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt,
            n: 1,
            size: &self.config.image_size,
        };

        debug!("Generating image with {}: {}", self.config.image_model, prompt);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.media_api_key)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let response = ensure_success(response).await?;

        let generated: ImageGenerationResponse = response.json().await.map_err(|e| {
            BrainError::ProcessingFailed(format!("Failed to parse image response: {}", e))
        })?;

        let url = generated.data.into_iter().next().and_then(|d| d.url);
        if url.is_none() {
            warn!("Image response contained no URL");
        }

        Ok(url)
    }

    fn name(&self) -> &str {
        "DalleImageGenerator"
    }
}
