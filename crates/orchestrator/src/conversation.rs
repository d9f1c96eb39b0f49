//! Per-sender conversation state.

use brain_core::{render_template, ChatMessage, ModelOptions, Role, Sender};
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;

/// Per-conversation model and feature settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSettings {
    /// Model name and generation parameters for replies.
    pub options: ModelOptions,
    /// Transcribe inbound voice notes.
    pub voice_transcription: bool,
    /// Honor image directives in generated replies.
    pub allow_images: bool,
    /// Name the assistant goes by, available to templates as `{agent_name}`.
    pub agent_name: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            options: ModelOptions::default(),
            voice_transcription: true,
            allow_images: true,
            agent_name: "ParityDx".to_string(),
        }
    }
}

/// The persisted part of a conversation.
///
/// Settings and templates are not stored; they come from the current
/// [`RelayConfig`] whenever a snapshot is restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    /// Channel address the conversation is keyed by.
    pub address: String,
    /// Sender display name at the last save.
    pub sender_name: String,
    /// Detected reply language, if any.
    pub language: Option<String>,
    /// Transcript, system message first.
    pub messages: Vec<ChatMessage>,
}

/// A conversation with one sender.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Who the conversation is with.
    pub sender: Sender,
    /// Ordered transcript. Index 0 holds the rendered system prompt.
    pub messages: Vec<ChatMessage>,
    /// Template for the system prompt.
    pub start_template: String,
    /// Template for the goodbye notice.
    pub goodbye_template: String,
    /// Model and feature settings.
    pub settings: ConversationSettings,
    /// Language replies should be written in, once detected.
    pub language: Option<String>,
}

impl Conversation {
    /// Create a fresh conversation holding only the rendered system message.
    pub fn new(sender: Sender, defaults: &RelayConfig, today: &str) -> Self {
        let mut conversation = Self {
            sender,
            messages: Vec::new(),
            start_template: defaults.start_template.clone(),
            goodbye_template: defaults.goodbye_template.clone(),
            settings: defaults.settings.clone(),
            language: None,
        };
        conversation.refresh_system_message(today);
        conversation
    }

    /// Rebuild a conversation from a stored snapshot.
    pub fn restore(
        snapshot: ConversationSnapshot,
        sender: Sender,
        defaults: &RelayConfig,
        today: &str,
    ) -> Self {
        let mut conversation = Self {
            sender,
            messages: snapshot.messages,
            start_template: defaults.start_template.clone(),
            goodbye_template: defaults.goodbye_template.clone(),
            settings: defaults.settings.clone(),
            language: snapshot.language,
        };
        conversation.refresh_system_message(today);
        conversation
    }

    /// Capture the persisted state.
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            address: self.sender.address.clone(),
            sender_name: self.sender.name.clone(),
            language: self.language.clone(),
            messages: self.messages.clone(),
        }
    }

    /// Channel address of the sender.
    pub fn address(&self) -> &str {
        &self.sender.address
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the system prompt for the current sender, date and language.
    pub fn render_system_prompt(&self, today: &str) -> String {
        let mut prompt = render_template(
            &self.start_template,
            &[
                ("user", self.sender.name.as_str()),
                ("today", today),
                ("agent_name", self.settings.agent_name.as_str()),
            ],
        );
        if let Some(language) = &self.language {
            prompt.push_str(&format!("\n\nAlways reply in {}.", language));
        }
        prompt
    }

    /// Overwrite the system message at index 0, inserting one if missing.
    pub fn refresh_system_message(&mut self, today: &str) {
        let system = ChatMessage::system(self.render_system_prompt(today));
        match self.messages.first_mut() {
            Some(first) if first.role == Role::System => *first = system,
            _ => self.messages.insert(0, system),
        }
    }

    /// Goodbye notice with the sender's name filled in.
    pub fn goodbye_text(&self) -> String {
        render_template(
            &self.goodbye_template,
            &[
                ("user", self.sender.name.as_str()),
                ("agent_name", self.settings.agent_name.as_str()),
            ],
        )
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Append a system message after the system prompt.
    pub fn push_system(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::system(content));
    }

    /// Render the transcript as `role: content` lines, for logging.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
