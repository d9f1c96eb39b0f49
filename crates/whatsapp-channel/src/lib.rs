//! WhatsApp transports for the conversation relay.
//!
//! Two implementations of [`orchestrator::Channel`]:
//!
//! - [`TwilioChannel`] - Twilio's WhatsApp API (form-encoded webhooks,
//!   REST sends with basic auth)
//! - [`CloudChannel`] - Meta's WhatsApp Cloud API (JSON webhooks, Graph API
//!   sends with a bearer token, read receipts, subscription handshake)
//!
//! # Example
//!
//! ```no_run
//! use orchestrator::Channel;
//! use whatsapp_channel::{CloudChannel, CloudConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = CloudChannel::new(CloudConfig::from_env()?)?;
//! channel.send_text("15551234567", "Hello!").await?;
//! # Ok(())
//! # }
//! ```

pub mod cloud;
pub mod config;
pub mod error;
pub mod twilio;
pub mod types;

pub use cloud::CloudChannel;
pub use config::{CloudConfig, CloudConfigBuilder, TwilioConfig, TwilioConfigBuilder};
pub use error::ChannelError;
pub use twilio::TwilioChannel;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
