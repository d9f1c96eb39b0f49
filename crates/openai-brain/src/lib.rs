//! OpenAI-compatible service clients.
//!
//! This crate talks to the OpenAI HTTP API (or Groq's OpenAI-compatible
//! endpoint for chat) and implements the `brain-core` collaborator traits:
//!
//! - [`OpenAiBrain`] - chat completions ([`Brain`])
//! - [`WhisperTranscriber`] - audio transcriptions ([`Transcriber`])
//! - [`DalleImageGenerator`] - image generations ([`ImageGenerator`])
//!
//! All three share one [`OpenAiConfig`], built once at startup.
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::{OpenAiBrain, OpenAiConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAiConfig::from_env()?;
//!     let brain = OpenAiBrain::new(config)?;
//!     // Use the brain...
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;
mod http;
mod images;
mod transcriber;

pub use brain::OpenAiBrain;
pub use config::{OpenAiConfig, OpenAiConfigBuilder, GROQ_API_URL, OPENAI_API_URL};
pub use images::DalleImageGenerator;
pub use transcriber::WhisperTranscriber;

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, ChatMessage, ImageGenerator, MediaData, ModelOptions,
    Transcriber,
};
