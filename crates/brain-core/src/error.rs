//! Error types for collaborator calls.

use thiserror::Error;

/// Errors returned by completion, transcription and image services.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The service is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// The request reached the service but could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// Transport-level failure talking to the service.
    #[error("network error: {0}")]
    Network(String),

    /// The service is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service has been shut down.
    #[error("brain shut down")]
    ShutDown,

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
