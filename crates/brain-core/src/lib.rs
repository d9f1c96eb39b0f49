//! Core traits and types shared by the relay crates.
//!
//! This crate defines the collaborator seams the orchestrator talks to:
//!
//! - [`Brain`] - chat completion over an ordered transcript
//! - [`Transcriber`] - speech to text for voice notes
//! - [`ImageGenerator`] - prompt to image URL
//! - [`InboundMessage`] / [`Sender`] - the canonical inbound record every
//!   transport adapter normalizes into
//! - [`ChatMessage`] / [`Role`] - transcript entries
//! - [`BrainError`] - error type for all collaborator calls
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, Brain, BrainError, ChatMessage, ModelOptions};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl Brain for Parrot {
//!     async fn complete(
//!         &self,
//!         messages: &[ChatMessage],
//!         _options: &ModelOptions,
//!     ) -> Result<String, BrainError> {
//!         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod media;
mod message;
mod options;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use media::{ImageGenerator, MediaData, Transcriber};
pub use message::{ChatMessage, InboundMessage, MediaRef, MessageKind, Role, Sender};
pub use options::ModelOptions;
pub use prompt::render_template;
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
