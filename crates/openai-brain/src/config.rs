//! Configuration for the OpenAI-compatible clients.

use brain_core::BrainError;
use std::env;

/// Default OpenAI API base URL.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Default Groq OpenAI-compatible API base URL.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Configuration shared by the chat, transcription and image clients.
///
/// Chat completions go to `chat_api_url`, which is Groq when `use_groq` is
/// set. Transcription and image generation always go to `media_api_url`
/// (OpenAI), since Groq does not serve image models.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Whether chat completions are served by Groq.
    pub use_groq: bool,

    /// Base URL for chat completions.
    pub chat_api_url: String,

    /// API key for chat completions.
    pub chat_api_key: String,

    /// Base URL for transcription and image generation.
    pub media_api_url: String,

    /// API key for transcription and image generation (may be empty).
    pub media_api_key: String,

    /// Speech-to-text model.
    pub transcription_model: String,

    /// Language hint sent with transcription requests.
    pub transcription_language: Option<String>,

    /// Image model.
    pub image_model: String,

    /// Image size, e.g. "1024x1024".
    pub image_size: String,

    /// HTTP timeout for all requests, in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            use_groq: false,
            chat_api_url: OPENAI_API_URL.to_string(),
            chat_api_key: String::new(),
            media_api_url: OPENAI_API_URL.to_string(),
            media_api_key: String::new(),
            transcription_model: "whisper-1".to_string(),
            transcription_language: Some("en".to_string()),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            timeout_secs: 60,
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Backend selection:
    /// - `USE_GROQ` - "true" to send chat completions to Groq (default: false)
    ///
    /// Required environment variables:
    /// - `GROQ_API_KEY` - when `USE_GROQ` is true
    /// - `OPENAI_API_KEY` - otherwise
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_KEY` - with Groq, enables transcription and images
    /// - `OPENAI_API_URL` - OpenAI base URL (default: https://api.openai.com/v1)
    /// - `GROQ_API_URL` - Groq base URL (default: https://api.groq.com/openai/v1)
    /// - `TRANSCRIPTION_MODEL` - default: whisper-1
    /// - `TRANSCRIPTION_LANGUAGE` - default: en ("auto" disables the hint)
    /// - `IMAGE_MODEL` - default: dall-e-3
    /// - `IMAGE_SIZE` - default: 1024x1024
    /// - `OPENAI_TIMEOUT_SECS` - default: 60
    pub fn from_env() -> Result<Self, BrainError> {
        let use_groq = env::var("USE_GROQ")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let openai_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| OPENAI_API_URL.to_string());
        let openai_key = env::var("OPENAI_API_KEY").ok();

        let (chat_api_url, chat_api_key) = if use_groq {
            let key = env::var("GROQ_API_KEY")
                .map_err(|_| BrainError::Configuration("GROQ_API_KEY not set".to_string()))?;
            let url = env::var("GROQ_API_URL").unwrap_or_else(|_| GROQ_API_URL.to_string());
            (url, key)
        } else {
            let key = openai_key
                .clone()
                .ok_or_else(|| BrainError::Configuration("OPENAI_API_KEY not set".to_string()))?;
            (openai_url.clone(), key)
        };

        let defaults = Self::default();

        let transcription_language = match env::var("TRANSCRIPTION_LANGUAGE") {
            Ok(lang) if lang.eq_ignore_ascii_case("auto") || lang.is_empty() => None,
            Ok(lang) => Some(lang),
            Err(_) => defaults.transcription_language,
        };

        Ok(Self {
            use_groq,
            chat_api_url,
            chat_api_key,
            media_api_url: openai_url,
            media_api_key: openai_key.unwrap_or_default(),
            transcription_model: env::var("TRANSCRIPTION_MODEL")
                .unwrap_or(defaults.transcription_model),
            transcription_language,
            image_model: env::var("IMAGE_MODEL").unwrap_or(defaults.image_model),
            image_size: env::var("IMAGE_SIZE").unwrap_or(defaults.image_size),
            timeout_secs: env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for OpenAiConfig.
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set one API key for both chat and media requests.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.config.chat_api_key = key.clone();
        self.config.media_api_key = key;
        self
    }

    /// Route chat completions to Groq with the given key.
    pub fn groq(mut self, key: impl Into<String>) -> Self {
        self.config.use_groq = true;
        self.config.chat_api_url = GROQ_API_URL.to_string();
        self.config.chat_api_key = key.into();
        self
    }

    /// Set the chat API base URL.
    pub fn chat_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.chat_api_url = url.into();
        self
    }

    /// Set the media API base URL.
    pub fn media_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.media_api_url = url.into();
        self
    }

    /// Set the transcription model.
    pub fn transcription_model(mut self, model: impl Into<String>) -> Self {
        self.config.transcription_model = model.into();
        self
    }

    /// Set the transcription language hint.
    pub fn transcription_language(mut self, language: Option<String>) -> Self {
        self.config.transcription_language = language;
        self
    }

    /// Set the image model.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    /// Set the image size.
    pub fn image_size(mut self, size: impl Into<String>) -> Self {
        self.config.image_size = size.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}
