//! Whisper speech-to-text client.

use brain_core::{async_trait, BrainError, MediaData, Transcriber};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::api_types::TranscriptionResponse;
use crate::config::OpenAiConfig;
use crate::http::{build_client, ensure_success, network_error};

/// Transcribes voice notes through the `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: Client,
    config: OpenAiConfig,
}

impl WhisperTranscriber {
    /// Create a new transcriber.
    pub fn new(config: OpenAiConfig) -> Result<Self, BrainError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &MediaData) -> Result<String, BrainError> {
        if self.config.media_api_key.is_empty() {
            return Err(BrainError::Configuration(
                "OPENAI_API_KEY not set; transcription unavailable".to_string(),
            ));
        }
        if audio.is_empty() {
            return Ok(String::new());
        }

        let url = format!("{}/audio/transcriptions", self.config.media_api_url);
        let file_name = format!("voice.{}", extension_for_mime(&audio.mime_type));

        let part = Part::bytes(audio.bytes.clone())
            .file_name(file_name)
            .mime_str(&audio.mime_type)
            .map_err(|e| BrainError::ProcessingFailed(format!("Invalid audio type: {}", e)))?;

        let mut form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("response_format", "json")
            .part("file", part);
        if let Some(language) = &self.config.transcription_language {
            form = form.text("language", language.clone());
        }

        debug!(
            "Transcribing {} bytes of {}",
            audio.bytes.len(),
            audio.mime_type
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.media_api_key)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        let response = ensure_success(response).await?;

        let transcription: TranscriptionResponse = response.json().await.map_err(|e| {
            BrainError::ProcessingFailed(format!("Failed to parse transcription: {}", e))
        })?;

        Ok(transcription.text.trim().to_string())
    }

    fn name(&self) -> &str {
        "WhisperTranscriber"
    }
}

/// File extension Whisper uses to detect the container format.
fn extension_for_mime(mime_type: &str) -> &'static str {
    let base = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match base.as_str() {
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => "m4a",
        "audio/amr" => "amr",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/webm" => "webm",
        "audio/flac" => "flac",
        _ => "ogg",
    }
}
