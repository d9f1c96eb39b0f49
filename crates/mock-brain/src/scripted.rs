//! Scripted brain implementation - replays queued replies.

use std::collections::VecDeque;
use std::sync::Mutex;

use brain_core::{async_trait, Brain, BrainError, ChatMessage, ModelOptions};

/// A brain that returns pre-queued replies in order and records every call.
///
/// Once the queue is empty it answers with the fallback reply. Recorded
/// calls let tests assert on exactly what transcript the caller sent.
pub struct ScriptedBrain {
    replies: Mutex<VecDeque<Result<String, BrainError>>>,
    fallback: String,
    calls: Mutex<Vec<(Vec<ChatMessage>, ModelOptions)>>,
}

impl ScriptedBrain {
    /// Create a brain that replays the given replies.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            fallback: String::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the reply used once the queue is exhausted.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        lock(&self.replies).push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: BrainError) {
        lock(&self.replies).push_back(Err(error));
    }

    /// All transcripts received so far, in call order.
    pub fn transcripts(&self) -> Vec<Vec<ChatMessage>> {
        lock(&self.calls).iter().map(|(m, _)| m.clone()).collect()
    }

    /// All options received so far, in call order.
    pub fn options(&self) -> Vec<ModelOptions> {
        lock(&self.calls).iter().map(|(_, o)| o.clone()).collect()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Default for ScriptedBrain {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ModelOptions,
    ) -> Result<String, BrainError> {
        lock(&self.calls).push((messages.to_vec(), options.clone()));

        let next = lock(&self.replies).pop_front();
        match next {
            Some(reply) => reply,
            None => Ok(self.fallback.clone()),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
