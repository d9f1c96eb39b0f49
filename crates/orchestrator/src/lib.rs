//! Conversation relay orchestrator.
//!
//! This crate provides the [`Orchestrator`] type which runs one
//! conversation turn per inbound message, for any transport implementing
//! [`Channel`].
//!
//! # Features
//!
//! - Keeps one transcript per sender, cached in a [`ConversationRegistry`]
//!   and persisted through a [`ConversationStore`]
//! - Serializes turns per sender, runs different senders concurrently
//! - Transcribes voice notes before replying
//! - Detects the reply language on the first turn
//! - Splits long replies for the channel size limit
//! - Fulfills `[img:"..."]` directives with generated images
//!
//! # Architecture
//!
//! ```text
//! Webhook body (from relay-server)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Channel::parse_inbound → InboundMessage                 │
//! │         ↓                                                   │
//! │  2. Registry get_or_create, lock conversation               │
//! │         ↓                                                   │
//! │  3. Normalize (voice note → Transcriber)                    │
//! │         ↓                                                   │
//! │  4. Blank / goodbye → notice, stop                          │
//! │         ↓                                                   │
//! │  5. First turn → LanguageDetector                           │
//! │         ↓                                                   │
//! │  6. Brain::complete over the transcript                     │
//! │         ↓                                                   │
//! │  7. Strip directives, send chunks                           │
//! │         ↓                                                   │
//! │  8. Image directive → ImageGenerator → send_image           │
//! │         ↓                                                   │
//! │  9. Save conversation                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use brain_core::{InboundMessage, Sender};
//! use mock_brain::{EchoBrain, StaticImageGenerator, StaticTranscriber};
//! use orchestrator::{
//!     ConversationRegistry, LoggingChannel, MemoryStore, Orchestrator, RelayConfig, Services,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(RelayConfig::default());
//!     let registry = Arc::new(ConversationRegistry::new(
//!         Arc::new(MemoryStore::new()),
//!         config.max_conversations,
//!     ));
//!     let services = Services::new(
//!         Arc::new(EchoBrain::new()),
//!         Arc::new(StaticTranscriber::new("voice note")),
//!         Arc::new(StaticImageGenerator::empty()),
//!         &config,
//!     );
//!
//!     let orchestrator = Orchestrator::new(LoggingChannel, services, registry, config);
//!
//!     let sender = Sender::new("+15551234567", Some("Ana".to_string()));
//!     let outcome = orchestrator
//!         .process(InboundMessage::text(sender, "What's the weather?"))
//!         .await?;
//!
//!     println!("Outcome: {:?}", outcome);
//!     Ok(())
//! }
//! ```

mod channel;
mod chunk;
mod config;
mod conversation;
mod directive;
mod error;
mod intent;
mod language;
mod orchestrator;
mod registry;
mod store;

// Public exports
pub use channel::{Channel, LoggingChannel, NoOpChannel};
pub use chunk::{split_reply, CONTINUATION_MARKER};
pub use config::{
    RelayConfig, RelayConfigBuilder, DEFAULT_GOODBYE_TEMPLATE, DEFAULT_MAX_CONVERSATIONS,
    DEFAULT_START_TEMPLATE,
};
pub use conversation::{today, Conversation, ConversationSettings, ConversationSnapshot};
pub use directive::{image_marker, parse_reply, ParsedReply};
pub use error::OrchestratorError;
pub use intent::{Intent, IntentClassifier, KeywordIntentClassifier};
pub use language::{parse_language, BrainLanguageDetector, LanguageDetector};
pub use orchestrator::{
    Orchestrator, Services, TerminationReason, TurnOutcome, EMPTY_REPLY_TEXT, IMAGE_FAILED_TEXT,
    NOT_UNDERSTOOD_TEXT,
};
pub use registry::{ConversationHandle, ConversationRegistry};
pub use store::{ConversationStore, MemoryStore, SqliteStore};

// Re-export commonly used types from dependencies
pub use brain_core::{InboundMessage, MediaData, MediaRef, MessageKind, Sender};
