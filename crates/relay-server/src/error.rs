//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The webhook's transport has no credentials configured.
    #[error("{0} transport is not configured")]
    TransportDisabled(&'static str),

    /// The turn failed after the message was accepted.
    #[error(transparent)]
    Turn(#[from] OrchestratorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::TransportDisabled(_) => {
                warn!("{}", self);
                StatusCode::NOT_FOUND
            }
            ApiError::Turn(err) => {
                error!("Turn failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({ "status": "error" });
        (status, Json(body)).into_response()
    }
}
