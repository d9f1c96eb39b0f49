//! Error types for orchestrator operations.

use brain_core::BrainError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Completion, transcription or detection failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Inbound media could not be retrieved.
    #[error("media unavailable: {0}")]
    MediaUnavailable(String),

    /// Conversation store failed.
    #[error("store error: {0}")]
    Store(String),

    /// Inbound payload could not be interpreted.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Relay configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<database::DatabaseError> for OrchestratorError {
    fn from(err: database::DatabaseError) -> Self {
        Self::Store(err.to_string())
    }
}
