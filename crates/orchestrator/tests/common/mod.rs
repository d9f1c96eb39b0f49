//! Shared test doubles for orchestrator integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brain_core::{Brain, ImageGenerator, Transcriber};
use mock_brain::{StaticImageGenerator, StaticTranscriber};
use orchestrator::{
    Channel, ConversationRegistry, ConversationStore, InboundMessage, MediaData, MediaRef,
    MemoryStore, Orchestrator, OrchestratorError, RelayConfig, Sender, Services,
};

/// Something the orchestrator asked the channel to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { to: String, text: String },
    Image { to: String, url: String, caption: Option<String> },
    Read(String),
}

#[derive(Default)]
struct ChannelState {
    sent: Vec<Sent>,
    text_calls: usize,
    fail_text_calls: HashSet<usize>,
    fail_images: bool,
    media: Option<MediaData>,
}

/// Channel that records outbound traffic and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    state: Arc<Mutex<ChannelState>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th `send_text` call (0-based, counting every call).
    pub fn fail_text_call(&self, n: usize) {
        self.state.lock().unwrap().fail_text_calls.insert(n);
    }

    pub fn fail_images(&self) {
        self.state.lock().unwrap().fail_images = true;
    }

    pub fn serve_media(&self, media: MediaData) {
        self.state.lock().unwrap().media = Some(media);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Texts successfully sent, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        serde_json::from_slice(body)
            .map(Some)
            .map_err(|e| OrchestratorError::InvalidPayload(e.to_string()))
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock().unwrap();
        let call = state.text_calls;
        state.text_calls += 1;
        if state.fail_text_calls.contains(&call) {
            return Err(OrchestratorError::SendFailed(format!("call {} failed", call)));
        }
        state.sent.push(Sent::Text {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_image(
        &self,
        to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_images {
            return Err(OrchestratorError::SendFailed("image rejected".to_string()));
        }
        state.sent.push(Sent::Image {
            to: to.to_string(),
            url: image_url.to_string(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn mark_read(&self, message_id: &str) -> Result<(), OrchestratorError> {
        self.state
            .lock()
            .unwrap()
            .sent
            .push(Sent::Read(message_id.to_string()));
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        self.state
            .lock()
            .unwrap()
            .media
            .clone()
            .ok_or_else(|| OrchestratorError::MediaUnavailable(media.location.clone()))
    }
}

pub const ADDRESS: &str = "whatsapp:+15551234567";

pub fn ana() -> Sender {
    Sender::new(ADDRESS, Some("Ana".to_string()))
}

pub fn text(body: &str) -> InboundMessage {
    InboundMessage::text(ana(), body)
}

pub fn config() -> RelayConfig {
    RelayConfig::builder()
        .start_template("You are {agent_name}, talking to {user} on {today}.")
        .goodbye_template("Bye {user}!")
        .agent_name("Ava")
        .build()
}

/// Everything a test needs to drive and inspect turns.
pub struct Harness {
    pub orchestrator: Orchestrator<RecordingChannel>,
    pub channel: RecordingChannel,
    pub store: Arc<MemoryStore>,
    pub registry: Arc<ConversationRegistry>,
}

pub struct HarnessBuilder {
    brain: Arc<dyn Brain>,
    transcriber: Arc<dyn Transcriber>,
    images: Arc<dyn ImageGenerator>,
    config: RelayConfig,
    store: Option<Arc<dyn ConversationStore>>,
}

impl HarnessBuilder {
    pub fn new(brain: Arc<dyn Brain>) -> Self {
        Self {
            brain,
            transcriber: Arc::new(StaticTranscriber::new("transcribed voice note")),
            images: Arc::new(StaticImageGenerator::new("https://img.example/generated.png")),
            config: config(),
            store: None,
        }
    }

    pub fn transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = images;
        self
    }

    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Harness {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn ConversationStore> = match self.store {
            Some(store) => store,
            None => memory.clone(),
        };
        let registry = Arc::new(ConversationRegistry::new(store, self.config.max_conversations));
        let services = Services::new(self.brain, self.transcriber, self.images, &self.config);
        let channel = RecordingChannel::new();
        let orchestrator = Orchestrator::new(
            channel.clone(),
            services,
            registry.clone(),
            Arc::new(self.config),
        );

        Harness {
            orchestrator,
            channel,
            store: memory,
            registry,
        }
    }
}
