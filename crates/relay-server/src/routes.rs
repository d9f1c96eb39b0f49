//! HTTP routes.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
}

const OK: Status = Status { status: "ok" };

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/whatsapp/reply", post(twilio_reply))
        .route("/whatsapp/status", post(twilio_status))
        .route("/webhook", get(cloud_verify).post(cloud_webhook))
        .with_state(state)
}

async fn health() -> Json<Status> {
    Json(OK)
}

async fn twilio_reply(State(state): State<AppState>, body: Bytes) -> Result<Json<Status>, ApiError> {
    let orchestrator = state.twilio.ok_or(ApiError::TransportDisabled("Twilio"))?;
    orchestrator.handle_webhook(&body).await?;
    Ok(Json(OK))
}

async fn twilio_status(body: Bytes) -> Json<Status> {
    debug!("Twilio status callback: {}", String::from_utf8_lossy(&body));
    Json(OK)
}

async fn cloud_verify(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let orchestrator = state.cloud.ok_or(ApiError::TransportDisabled("Cloud API"))?;

    let verified = orchestrator.channel().verify_subscription(
        params.get("hub.mode").map(String::as_str),
        params.get("hub.verify_token").map(String::as_str),
        params.get("hub.challenge").map(String::as_str),
    );

    Ok(match verified {
        Some(challenge) => (StatusCode::OK, challenge).into_response(),
        None => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
    })
}

async fn cloud_webhook(State(state): State<AppState>, body: Bytes) -> Result<Json<Status>, ApiError> {
    let orchestrator = state.cloud.ok_or(ApiError::TransportDisabled("Cloud API"))?;
    orchestrator.handle_webhook(&body).await?;
    Ok(Json(OK))
}
