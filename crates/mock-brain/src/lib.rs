//! Mock collaborator implementations for relay tests.
//!
//! This crate provides mock implementations of the `brain-core` traits:
//! - `EchoBrain` - Echoes the last user message back
//! - `ScriptedBrain` - Returns queued replies and records every transcript
//! - `DelayedBrain` - Wraps another brain with artificial delay
//! - `FailingBrain` - Always fails
//! - `StaticTranscriber` / `StaticImageGenerator` - Fixed media results
//!
//! For production processing, use the `openai-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, ChatMessage, EchoBrain, ModelOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoBrain::new();
//!
//!     let transcript = vec![ChatMessage::system("be nice"), ChatMessage::user("Hello!")];
//!
//!     let reply = brain.complete(&transcript, &ModelOptions::default()).await?;
//!     println!("Reply: {}", reply);
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod media;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, ChatMessage, ImageGenerator, MediaData, ModelOptions, Role,
    Transcriber,
};

// Export mock implementations
pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use media::{StaticImageGenerator, StaticTranscriber};
pub use scripted::ScriptedBrain;
