//! Reply-language detection.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatMessage, ModelOptions};
use tracing::debug;

/// Detects the language a text is written in.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, lowercased (e.g. "spanish").
    ///
    /// Returns `None` when no language could be determined.
    async fn detect(&self, text: &str) -> Result<Option<String>, BrainError>;

    /// Get a human-readable name for this detector.
    fn name(&self) -> &str;
}

const DETECTION_PROMPT: &str = "You are a language recognition program. \
You can only output a single word saying the language of a given text.";

const DETECTION_EXAMPLES: &[(&str, &str)] = &[
    ("Hello world", "english"),
    ("Bonjour le monde", "french"),
    ("Hola mundo", "spanish"),
    ("Hallo Welt", "german"),
];

/// Few-shot language detection through a completion model.
pub struct BrainLanguageDetector {
    brain: Arc<dyn Brain>,
    options: ModelOptions,
}

impl BrainLanguageDetector {
    /// Create a detector that asks `brain` using `model`.
    pub fn new(brain: Arc<dyn Brain>, model: impl Into<String>) -> Self {
        Self {
            brain,
            options: ModelOptions::classifier(model),
        }
    }
}

/// Build the single system message sent for detection.
fn detection_prompt(text: &str) -> String {
    let examples = DETECTION_EXAMPLES
        .iter()
        .map(|(sample, language)| format!("\"{}\" -> {}", sample, language))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} Some \"text\" -> reply example outputs are: {}\n---\n{} ->",
        DETECTION_PROMPT, examples, text
    )
}

/// Reduce a model answer to a single lowercase language word.
pub fn parse_language(answer: &str) -> Option<String> {
    let answer = match answer.find(" ->") {
        Some(index) => &answer[..index],
        None => answer,
    };

    answer
        .split_whitespace()
        .next()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
}

#[async_trait]
impl LanguageDetector for BrainLanguageDetector {
    async fn detect(&self, text: &str) -> Result<Option<String>, BrainError> {
        let messages = [ChatMessage::system(detection_prompt(text))];
        let answer = self.brain.complete(&messages, &self.options).await?;
        let language = parse_language(&answer);

        debug!("Language detection answer {:?} -> {:?}", answer, language);
        Ok(language)
    }

    fn name(&self) -> &str {
        "BrainLanguageDetector"
    }
}
