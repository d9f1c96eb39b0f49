//! Media collaborators: transcription and image generation.

use async_trait::async_trait;

use crate::error::BrainError;

/// Downloaded media bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaData {
    /// Raw content.
    pub bytes: Vec<u8>,
    /// MIME type of the content.
    pub mime_type: String,
}

impl MediaData {
    /// Create media data.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Whether there is no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Speech-to-text service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio into text.
    async fn transcribe(&self, audio: &MediaData) -> Result<String, BrainError>;

    /// Get a human-readable name for this implementation.
    fn name(&self) -> &str;
}

/// Text-to-image service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for the prompt.
    ///
    /// Returns a publicly fetchable URL, or `None` when the service produced
    /// no image.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BrainError>;

    /// Get a human-readable name for this implementation.
    fn name(&self) -> &str;
}
