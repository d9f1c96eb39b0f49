//! Relay configuration.

use std::env;
use std::path::Path;

use brain_core::ModelOptions;

use crate::conversation::ConversationSettings;
use crate::error::OrchestratorError;

/// System prompt used when `CHAT_START_TEMPLATE` is not set.
pub const DEFAULT_START_TEMPLATE: &str = "You are {agent_name}, a friendly assistant chatting with {user} on WhatsApp. \
Today is {today}. Keep replies short and conversational. \
If the user asks for a picture, include [img:\"<description of the picture>\"] in your reply.";

/// Goodbye notice used when `GOODBYE_MESSAGE` is not set.
pub const DEFAULT_GOODBYE_TEMPLATE: &str = "Goodbye! I'll be here if you need me.";

/// Default cap on tracked senders before LRU eviction.
pub const DEFAULT_MAX_CONVERSATIONS: usize = 10_000;

/// Defaults applied to every conversation plus relay-wide limits.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Settings seeded into each conversation.
    pub settings: ConversationSettings,

    /// Model used for language detection.
    pub language_model: String,

    /// System prompt template (`{user}`, `{today}`, `{agent_name}`).
    pub start_template: String,

    /// Goodbye template (`{user}`, `{agent_name}`).
    pub goodbye_template: String,

    /// Replies longer than this many characters are chunked.
    pub max_message_chars: usize,

    /// Characters per chunk, before the `...` marker.
    pub chunk_chars: usize,

    /// Maximum conversations kept in memory.
    pub max_conversations: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        let settings = ConversationSettings::default();
        Self {
            language_model: settings.options.model.clone(),
            settings,
            start_template: DEFAULT_START_TEMPLATE.to_string(),
            goodbye_template: DEFAULT_GOODBYE_TEMPLATE.to_string(),
            max_message_chars: 1600,
            chunk_chars: 1500,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
        }
    }
}

impl RelayConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `CHAT_MODEL` - reply model (default: llama-3.3-70b-versatile)
    /// - `LANGUAGE_MODEL` - language detection model (default: `CHAT_MODEL`)
    /// - `AGENT_NAME` - default: ParityDx
    /// - `CHAT_START_TEMPLATE` - system prompt, inline or a path to a file
    /// - `GOODBYE_MESSAGE` - goodbye template
    /// - `MAX_TOKENS` - default: 400
    /// - `TEMPERATURE` - default: 0.7
    /// - `TOP_P` - default: 1
    /// - `FREQUENCY_PENALTY` / `PRESENCE_PENALTY` - default: 0
    /// - `VOICE_TRANSCRIPTION` - "false" disables voice notes (default: true)
    /// - `ALLOW_IMAGES` - "false" disables image directives (default: true)
    /// - `MAX_MESSAGE_CHARS` - default: 1600
    /// - `CHUNK_CHARS` - default: 1500
    /// - `MAX_CONVERSATIONS` - default: 10000
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let defaults = Self::default();
        let default_options = defaults.settings.options.clone();

        let model = env::var("CHAT_MODEL").unwrap_or(default_options.model);
        let language_model = env::var("LANGUAGE_MODEL").unwrap_or_else(|_| model.clone());

        let options = ModelOptions {
            model,
            max_tokens: parse_var("MAX_TOKENS").or(default_options.max_tokens),
            temperature: parse_var("TEMPERATURE").or(default_options.temperature),
            top_p: parse_var("TOP_P").or(default_options.top_p),
            frequency_penalty: parse_var("FREQUENCY_PENALTY")
                .or(default_options.frequency_penalty),
            presence_penalty: parse_var("PRESENCE_PENALTY").or(default_options.presence_penalty),
        };

        let settings = ConversationSettings {
            options,
            voice_transcription: flag_var("VOICE_TRANSCRIPTION")
                .unwrap_or(defaults.settings.voice_transcription),
            allow_images: flag_var("ALLOW_IMAGES").unwrap_or(defaults.settings.allow_images),
            agent_name: env::var("AGENT_NAME").unwrap_or(defaults.settings.agent_name),
        };

        let start_template = match env::var("CHAT_START_TEMPLATE") {
            Ok(value) if !value.trim().is_empty() => load_template(&value)?,
            _ => defaults.start_template,
        };

        let config = Self {
            settings,
            language_model,
            start_template,
            goodbye_template: env::var("GOODBYE_MESSAGE").unwrap_or(defaults.goodbye_template),
            max_message_chars: parse_var("MAX_MESSAGE_CHARS").unwrap_or(defaults.max_message_chars),
            chunk_chars: parse_var("CHUNK_CHARS").unwrap_or(defaults.chunk_chars),
            max_conversations: parse_var("MAX_CONVERSATIONS")
                .unwrap_or(defaults.max_conversations),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a new config builder.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }

    /// Check chunking limits.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.chunk_chars == 0 {
            return Err(OrchestratorError::Configuration(
                "CHUNK_CHARS must be greater than zero".to_string(),
            ));
        }
        if self.chunk_chars > self.max_message_chars {
            return Err(OrchestratorError::Configuration(format!(
                "CHUNK_CHARS ({}) must not exceed MAX_MESSAGE_CHARS ({})",
                self.chunk_chars, self.max_message_chars
            )));
        }
        Ok(())
    }
}

/// Read a template from a file when `value` names one, else use it inline.
fn load_template(value: &str) -> Result<String, OrchestratorError> {
    let path = Path::new(value);
    if path.is_file() {
        return std::fs::read_to_string(path).map_err(|e| {
            OrchestratorError::Configuration(format!(
                "Failed to read start template {}: {}",
                path.display(),
                e
            ))
        });
    }
    Ok(value.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn flag_var(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
}

/// Builder for RelayConfig.
#[derive(Debug, Default)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    /// Set the reply model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.settings.options.model = model.into();
        self
    }

    /// Set all generation options at once.
    pub fn options(mut self, options: ModelOptions) -> Self {
        self.config.settings.options = options;
        self
    }

    /// Set the language detection model.
    pub fn language_model(mut self, model: impl Into<String>) -> Self {
        self.config.language_model = model.into();
        self
    }

    /// Set the agent name.
    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.config.settings.agent_name = name.into();
        self
    }

    /// Set the system prompt template.
    pub fn start_template(mut self, template: impl Into<String>) -> Self {
        self.config.start_template = template.into();
        self
    }

    /// Set the goodbye template.
    pub fn goodbye_template(mut self, template: impl Into<String>) -> Self {
        self.config.goodbye_template = template.into();
        self
    }

    /// Enable or disable voice transcription.
    pub fn voice_transcription(mut self, enabled: bool) -> Self {
        self.config.settings.voice_transcription = enabled;
        self
    }

    /// Enable or disable image directives.
    pub fn allow_images(mut self, enabled: bool) -> Self {
        self.config.settings.allow_images = enabled;
        self
    }

    /// Set the chunking limits.
    pub fn chunking(mut self, max_message_chars: usize, chunk_chars: usize) -> Self {
        self.config.max_message_chars = max_message_chars;
        self.config.chunk_chars = chunk_chars;
        self
    }

    /// Set the in-memory conversation cap.
    pub fn max_conversations(mut self, max: usize) -> Self {
        self.config.max_conversations = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RelayConfig {
        self.config
    }
}
