//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::ChatMessage;
use crate::options::ModelOptions;

/// A chat completion backend.
///
/// Given the full ordered transcript, returns the generated reply text.
/// Implementations are stateless with respect to conversations; the caller
/// owns the transcript. This trait is object-safe and is normally shared as
/// `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate a reply for the given transcript.
    ///
    /// # Arguments
    ///
    /// * `messages` - Ordered transcript, system message first.
    /// * `options` - Model name and sampling parameters.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ModelOptions,
    ) -> Result<String, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to process requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
