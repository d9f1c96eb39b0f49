//! Webhook server for the WhatsApp conversation relay.
//!
//! Routes:
//!
//! - `POST /whatsapp/reply` - Twilio incoming-message webhook
//! - `POST /whatsapp/status` - Twilio delivery status callback
//! - `GET /webhook` - Cloud API subscription handshake
//! - `POST /webhook` - Cloud API notifications
//! - `GET /health` - liveness
//!
//! Each transport is served only when its credentials are configured.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
