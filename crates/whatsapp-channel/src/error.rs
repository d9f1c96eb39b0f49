//! Error types for the WhatsApp transports.

use orchestrator::OrchestratorError;
use thiserror::Error;

/// Errors that can occur when talking to a WhatsApp provider.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the provider API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Webhook payload could not be interpreted.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<ChannelError> for OrchestratorError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::InvalidPayload(reason) => OrchestratorError::InvalidPayload(reason),
            ChannelError::Config(reason) => OrchestratorError::Configuration(reason),
            other => OrchestratorError::SendFailed(other.to_string()),
        }
    }
}
