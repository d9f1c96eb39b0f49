//! Shared HTTP helpers.

use std::time::Duration;

use brain_core::BrainError;
use reqwest::{Client, Response};

use crate::api_types::ApiError;

/// Build an HTTP client with the configured timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, BrainError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport error into a BrainError.
pub(crate) fn network_error(e: reqwest::Error) -> BrainError {
    if e.is_timeout() {
        BrainError::Timeout
    } else {
        BrainError::Network(format!("Failed to send request: {}", e))
    }
}

/// Return the response if it succeeded, otherwise an error with the API message.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, BrainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();

    // Try to parse as API error
    let message = serde_json::from_str::<ApiError>(&error_text)
        .map(|api_error| api_error.error.message)
        .unwrap_or(error_text);

    if status.as_u16() == 429 || status.is_server_error() {
        return Err(BrainError::Unavailable(format!(
            "API error ({}): {}",
            status.as_u16(),
            message
        )));
    }

    Err(BrainError::ProcessingFailed(format!(
        "API error ({}): {}",
        status.as_u16(),
        message
    )))
}
