//! Fixed-result transcriber and image generator.

use std::sync::atomic::{AtomicUsize, Ordering};

use brain_core::{async_trait, BrainError, ImageGenerator, MediaData, Transcriber};

/// A transcriber that returns the same text for any audio, or always fails.
#[derive(Debug, Default)]
pub struct StaticTranscriber {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StaticTranscriber {
    /// Create a transcriber that always returns `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a transcriber whose every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of transcriptions requested.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _audio: &MediaData) -> Result<String, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| BrainError::ProcessingFailed("mock transcription failure".to_string()))
    }

    fn name(&self) -> &str {
        "StaticTranscriber"
    }
}

/// An image generator that returns a fixed URL, nothing, or always fails.
#[derive(Debug)]
pub struct StaticImageGenerator {
    outcome: Result<Option<String>, String>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl StaticImageGenerator {
    /// Create a generator that always returns `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_outcome(Ok(Some(url.into())))
    }

    /// Create a generator that succeeds without producing an image.
    pub fn empty() -> Self {
        Self::with_outcome(Ok(None))
    }

    /// Create a generator whose every call fails.
    pub fn failing() -> Self {
        Self::with_outcome(Err("mock image failure".to_string()))
    }

    fn with_outcome(outcome: Result<Option<String>, String>) -> Self {
        Self {
            outcome,
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl ImageGenerator for StaticImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BrainError> {
        match self.prompts.lock() {
            Ok(mut prompts) => prompts.push(prompt.to_string()),
            Err(poisoned) => poisoned.into_inner().push(prompt.to_string()),
        }
        self.outcome
            .clone()
            .map_err(BrainError::ProcessingFailed)
    }

    fn name(&self) -> &str {
        "StaticImageGenerator"
    }
}
