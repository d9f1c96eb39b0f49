//! Conversation-ending intent detection.

use async_trait::async_trait;
use brain_core::BrainError;

/// What the user wants from the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Keep talking.
    Continue,
    /// The user is saying goodbye.
    Goodbye,
}

/// Classifies inbound text into an [`Intent`].
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify normalized inbound text.
    async fn classify(&self, text: &str) -> Result<Intent, BrainError>;

    /// Get a human-readable name for this classifier.
    fn name(&self) -> &str;
}

/// Farewell phrases recognized by default.
const GOODBYE_PHRASES: &[&str] = &[
    "bye",
    "bye bye",
    "byebye",
    "goodbye",
    "good bye",
    "good night",
    "goodnight",
    "see you",
    "see ya",
    "see you later",
    "see you soon",
    "talk later",
    "talk to you later",
    "farewell",
    "cya",
    "adios",
    "adiós",
    "chao",
    "chau",
    "ciao",
    "hasta luego",
    "hasta pronto",
    "au revoir",
    "tschüss",
];

/// Words that may surround a farewell without changing its meaning.
const FILLER_PHRASES: &[&str] = &[
    "ok",
    "okay",
    "k",
    "well",
    "so",
    "and",
    "then",
    "now",
    "for now",
    "please",
    "thanks",
    "thank you",
    "thx",
    "ty",
    "cheers",
    "everyone",
    "all",
];

/// Matches messages made up only of farewell and filler phrases.
///
/// Questions never match, and a message needs at least one farewell phrase.
#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    phrases: Vec<Vec<String>>,
    fillers: Vec<Vec<String>>,
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::with_phrases(GOODBYE_PHRASES.iter().copied())
    }
}

impl KeywordIntentClassifier {
    /// Create a classifier with the default phrases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom farewell phrases.
    pub fn with_phrases<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            phrases: to_word_lists(phrases),
            fillers: to_word_lists(FILLER_PHRASES.iter().copied()),
        }
    }

    /// Also accept `filler` around a farewell, e.g. the agent's name.
    pub fn with_filler(mut self, filler: &str) -> Self {
        let filler = words(filler);
        if !filler.is_empty() {
            self.fillers.push(filler);
        }
        self
    }

    /// Synchronous check used by the async trait method.
    pub fn is_goodbye(&self, text: &str) -> bool {
        if text.trim_end().ends_with('?') {
            return false;
        }
        let message = words(text);
        !message.is_empty() && self.covers(&message, false)
    }

    /// Whether `rest` splits into farewell and filler phrases, with at least
    /// one farewell overall.
    fn covers(&self, rest: &[String], seen_farewell: bool) -> bool {
        if rest.is_empty() {
            return seen_farewell;
        }
        self.phrases
            .iter()
            .any(|p| rest.starts_with(p) && self.covers(&rest[p.len()..], true))
            || self
                .fillers
                .iter()
                .any(|f| rest.starts_with(f) && self.covers(&rest[f.len()..], seen_farewell))
    }
}

fn to_word_lists<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Vec<Vec<String>> {
    phrases
        .into_iter()
        .map(words)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Lowercased words with punctuation and emoji dropped.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, text: &str) -> Result<Intent, BrainError> {
        Ok(if self.is_goodbye(text) {
            Intent::Goodbye
        } else {
            Intent::Continue
        })
    }

    fn name(&self) -> &str {
        "KeywordIntentClassifier"
    }
}
