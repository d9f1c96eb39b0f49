//! Generation parameters for completion requests.

use serde::{Deserialize, Serialize};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Model name and sampling parameters for one completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Model name to use.
    pub model: String,
    /// Maximum tokens for the reply.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
    /// Nucleus sampling mass.
    pub top_p: Option<f32>,
    /// Penalty for repeated tokens.
    pub frequency_penalty: Option<f32>,
    /// Penalty for tokens already present.
    pub presence_penalty: Option<f32>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(400),
            temperature: Some(0.7),
            top_p: Some(1.0),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
        }
    }
}

impl ModelOptions {
    /// Options for short deterministic classification prompts.
    pub fn classifier(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: Some(10),
            temperature: Some(0.0),
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }
}
