//! Failing brain implementation - every call errors.

use brain_core::{async_trait, Brain, BrainError, ChatMessage, ModelOptions};

/// A brain whose completions always fail with `BrainError::Unavailable`.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    reason: String,
}

impl FailingBrain {
    /// Create a failing brain with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new("mock failure")
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _options: &ModelOptions,
    ) -> Result<String, BrainError> {
        Err(BrainError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::new("down");
        match brain.complete(&[], &ModelOptions::default()).await {
            Err(BrainError::Unavailable(reason)) => assert_eq!(reason, "down"),
            other => panic!("Expected Unavailable, got {:?}", other),
        }
        assert!(!brain.is_ready().await);
    }
}
