//! OpenAiBrain implementation using an OpenAI-compatible chat API.

use brain_core::{async_trait, Brain, BrainError, ChatMessage, ModelOptions};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenAiConfig;
use crate::http::{build_client, ensure_success, network_error};

/// Model served by Groq in place of OpenAI chat models.
const GROQ_FALLBACK_MODEL: &str = "llama-3.3-70b-versatile";

/// OpenAI model names that Groq does not serve.
const OPENAI_ONLY_MODELS: [&str; 3] = ["gpt-3.5-turbo", "gpt-4o-mini", "gpt-4"];

/// A brain that sends the full transcript to a chat completions endpoint.
///
/// The brain is stateless: callers own the transcript and pass it in on
/// every call. With `use_groq` the request goes to Groq and OpenAI-only
/// model names are swapped for a Llama model.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, BrainError> {
        let client = build_client(config.timeout_secs)?;

        info!(
            "OpenAiBrain initialized with endpoint: {}, groq: {}",
            config.chat_api_url, config.use_groq
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &ModelOptions,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = format!("{}/chat/completions", self.config.chat_api_url);
        let model = resolve_model(&self.config, &options.model);

        let request = ChatCompletionRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            n: 1,
        };

        debug!(
            "Sending chat completion: model={}, messages={}",
            model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.chat_api_key)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let response = ensure_success(response).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ModelOptions,
    ) -> Result<String, BrainError> {
        let completion = self.chat_completion(messages, options).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            if reason == "length" {
                debug!("Completion truncated at max_tokens");
            }
        }

        // The relay substitutes its own notice for an empty reply
        let text = choice.and_then(|c| c.message.content).unwrap_or_else(|| {
            warn!("No content in response");
            String::new()
        });

        Ok(text)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }

    async fn is_ready(&self) -> bool {
        !self.config.chat_api_key.is_empty()
    }
}

/// Pick the model name to send, swapping OpenAI-only names when on Groq.
fn resolve_model<'a>(config: &OpenAiConfig, requested: &'a str) -> &'a str {
    if config.use_groq && OPENAI_ONLY_MODELS.contains(&requested) {
        return GROQ_FALLBACK_MODEL;
    }
    requested
}
