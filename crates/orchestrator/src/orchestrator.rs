//! Main orchestrator that runs one conversation turn per inbound message.

use std::sync::Arc;

use brain_core::{Brain, ImageGenerator, InboundMessage, MessageKind, Transcriber};
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::chunk::split_reply;
use crate::config::RelayConfig;
use crate::conversation::{today, Conversation};
use crate::directive::{image_marker, parse_reply};
use crate::error::OrchestratorError;
use crate::intent::{Intent, IntentClassifier, KeywordIntentClassifier};
use crate::language::{BrainLanguageDetector, LanguageDetector};
use crate::registry::ConversationRegistry;

/// Sent for blank input and in place of a chunk that failed to send.
pub const NOT_UNDERSTOOD_TEXT: &str = "Sorry, I didn't understand that. Please try again.";

/// Sent when the model produced no visible text and no image request.
pub const EMPTY_REPLY_TEXT: &str = "Sorry, I couldn't come up with a reply. Please try again.";

/// Sent when a requested image could not be generated or delivered.
pub const IMAGE_FAILED_TEXT: &str = "Sorry, I couldn't generate the image. Please try again.";

/// Why a turn stopped before generating a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Inbound text was blank after normalization.
    Empty,
    /// The user said goodbye.
    Goodbye,
}

/// Result of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A notice was sent and the transcript left untouched.
    Terminated(TerminationReason),
    /// A reply was generated and relayed.
    Replied {
        /// Text messages delivered, apologies excluded.
        chunks_sent: usize,
        /// Whether the reply carried an image directive.
        image_requested: bool,
    },
}

/// Collaborators shared by every orchestrator.
#[derive(Clone)]
pub struct Services {
    /// Reply generation.
    pub brain: Arc<dyn Brain>,
    /// Voice note transcription.
    pub transcriber: Arc<dyn Transcriber>,
    /// Image generation for directives.
    pub images: Arc<dyn ImageGenerator>,
    /// First-turn language detection.
    pub language: Arc<dyn LanguageDetector>,
    /// Goodbye detection.
    pub intent: Arc<dyn IntentClassifier>,
}

impl Services {
    /// Bundle collaborators, detecting language with `brain` and goodbyes
    /// with the keyword classifier (which accepts the agent's name).
    pub fn new(
        brain: Arc<dyn Brain>,
        transcriber: Arc<dyn Transcriber>,
        images: Arc<dyn ImageGenerator>,
        config: &RelayConfig,
    ) -> Self {
        let language = Arc::new(BrainLanguageDetector::new(
            brain.clone(),
            config.language_model.clone(),
        ));
        Self {
            brain,
            transcriber,
            images,
            language,
            intent: Arc::new(
                KeywordIntentClassifier::new().with_filler(&config.settings.agent_name),
            ),
        }
    }

    /// Replace the language detector.
    pub fn with_language_detector(mut self, language: Arc<dyn LanguageDetector>) -> Self {
        self.language = language;
        self
    }

    /// Replace the intent classifier.
    pub fn with_intent_classifier(mut self, intent: Arc<dyn IntentClassifier>) -> Self {
        self.intent = intent;
        self
    }
}

/// Runs conversation turns for one channel.
///
/// Turn sequence:
/// - resolve the sender's conversation and hold its lock for the turn
/// - normalize the inbound message to text (transcribing voice notes)
/// - stop early on blank input or a goodbye
/// - detect the reply language on the first turn
/// - generate, clean and relay the reply in chunks
/// - fulfill an image directive, if any
/// - persist the conversation
///
/// Several orchestrators (one per channel) may share a registry.
pub struct Orchestrator<C: Channel> {
    channel: C,
    services: Services,
    registry: Arc<ConversationRegistry>,
    config: Arc<RelayConfig>,
}

impl<C: Channel> Orchestrator<C> {
    /// Create a new orchestrator with the given components.
    pub fn new(
        channel: C,
        services: Services,
        registry: Arc<ConversationRegistry>,
        config: Arc<RelayConfig>,
    ) -> Self {
        info!(
            "Orchestrator for {} using brain {} (store: {}, intent: {})",
            channel.name(),
            services.brain.name(),
            registry.store_name(),
            services.intent.name()
        );

        Self {
            channel,
            services,
            registry,
            config,
        }
    }

    /// Get the channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Get the shared registry.
    pub fn registry(&self) -> &Arc<ConversationRegistry> {
        &self.registry
    }

    /// Parse a webhook body with the channel and run a turn if it holds a message.
    pub async fn handle_webhook(
        &self,
        body: &[u8],
    ) -> Result<Option<TurnOutcome>, OrchestratorError> {
        let message = match self.channel.parse_inbound(body) {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!("[{}] Webhook carried no message", self.channel.name());
                return Ok(None);
            }
            Err(OrchestratorError::InvalidPayload(reason)) => {
                warn!("[{}] Ignoring malformed payload: {}", self.channel.name(), reason);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        self.process(message).await.map(Some)
    }

    /// Process an inbound message end-to-end.
    pub async fn process(&self, message: InboundMessage) -> Result<TurnOutcome, OrchestratorError> {
        let to = message.sender.address.clone();

        info!(
            "[{}] Processing {:?} message from {} ({})",
            self.channel.name(),
            message.kind,
            to,
            message.sender.name
        );

        // 1. Resolve the conversation; the lock serializes this sender's turns
        let handle = self
            .registry
            .get_or_create(&message.sender, &self.config)
            .await?;
        let mut conversation = handle.lock().await;
        conversation.sender = message.sender.clone();
        conversation.refresh_system_message(&today());

        if let Some(id) = &message.message_id {
            if let Err(e) = self.channel.mark_read(id).await {
                warn!("Failed to mark {} as read: {}", id, e);
            }
        }

        // 2. Normalize to text
        let text = self.normalize(&message, &conversation).await?;

        // 3. Blank input or goodbye ends the exchange without touching the transcript
        if text.trim().is_empty() {
            info!("Empty message from {}", to);
            self.send_or_log(&to, NOT_UNDERSTOOD_TEXT).await;
            return Ok(TurnOutcome::Terminated(TerminationReason::Empty));
        }

        if self.classify(&text).await == Intent::Goodbye {
            info!("Goodbye from {}", to);
            self.send_or_log(&to, &conversation.goodbye_text()).await;
            return Ok(TurnOutcome::Terminated(TerminationReason::Goodbye));
        }

        // 4. First real turn: detect the reply language
        if conversation.len() == 1 {
            self.bootstrap_language(&mut conversation, &text).await;
        }

        // 5. Append the user turn
        conversation.push_user(text);

        // 6. Generate
        let reply = self
            .services
            .brain
            .complete(&conversation.messages, &conversation.settings.options)
            .await?;
        let reply = reply.trim();
        info!("Generated reply of length {}", reply.chars().count());

        // 7. Strip directives
        let parsed = parse_reply(reply, conversation.settings.allow_images);

        // 8. Relay; a blank reply with no image gets the fallback notice
        let chunks_sent = if !parsed.text.is_empty() {
            self.relay(&to, &parsed.text).await
        } else if parsed.image_prompt.is_none() {
            warn!("Blank reply for {}, sending fallback", to);
            self.send_or_log(&to, EMPTY_REPLY_TEXT).await;
            0
        } else {
            0
        };

        // 9. Append the cleaned reply
        conversation.push_assistant(parsed.text);

        // 10. Fulfill the image directive
        let image_requested = parsed.image_prompt.is_some();
        if let Some(prompt) = parsed.image_prompt {
            conversation.push_system(image_marker(&prompt));
            self.send_generated_image(&to, &prompt).await;
        }

        // 11. Persist
        self.registry.save(&conversation).await;

        debug!(
            "--------------\nConversation:\n{}\n--------------",
            conversation.transcript()
        );

        Ok(TurnOutcome::Replied {
            chunks_sent,
            image_requested,
        })
    }

    /// Turn an inbound message into the text to answer.
    async fn normalize(
        &self,
        message: &InboundMessage,
        conversation: &Conversation,
    ) -> Result<String, OrchestratorError> {
        match message.kind {
            MessageKind::Text | MessageKind::Image => Ok(message.text.clone().unwrap_or_default()),
            MessageKind::Audio => {
                if !conversation.settings.voice_transcription {
                    debug!("Voice transcription disabled, ignoring audio");
                    return Ok(String::new());
                }
                let Some(media) = &message.media else {
                    warn!("Audio message without media reference");
                    return Ok(String::new());
                };

                let audio = match self.channel.fetch_media(media).await {
                    Ok(audio) if !audio.is_empty() => audio,
                    Ok(_) => {
                        warn!("Fetched empty audio from {}", media.location);
                        return Ok(String::new());
                    }
                    Err(e) => {
                        warn!("Failed to fetch audio {}: {}", media.location, e);
                        return Ok(String::new());
                    }
                };

                let text = self.services.transcriber.transcribe(&audio).await?;
                info!("Transcribed voice note ({} chars)", text.chars().count());
                Ok(text)
            }
            MessageKind::Unsupported => {
                debug!("Unsupported message type, treating as empty");
                Ok(String::new())
            }
        }
    }

    async fn classify(&self, text: &str) -> Intent {
        match self.services.intent.classify(text).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!("Intent classification failed: {}", e);
                Intent::Continue
            }
        }
    }

    async fn bootstrap_language(&self, conversation: &mut Conversation, text: &str) {
        match self.services.language.detect(text).await {
            Ok(Some(language)) => {
                info!("Detected language {} for {}", language, conversation.address());
                conversation.language = Some(language);
                conversation.refresh_system_message(&today());
            }
            Ok(None) => debug!("No language detected for {}", conversation.address()),
            Err(e) => warn!("Language detection failed: {}", e),
        }
    }

    /// Send a reply, chunked if needed. Returns the number of chunks delivered.
    async fn relay(&self, to: &str, text: &str) -> usize {
        let chunks = split_reply(text, self.config.max_message_chars, self.config.chunk_chars);
        if chunks.len() > 1 {
            debug!("Splitting reply into {} chunks", chunks.len());
        }

        let mut sent = 0;
        for chunk in &chunks {
            match self.channel.send_text(to, chunk).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("Failed to send reply chunk to {}: {}", to, e);
                    self.send_or_log(to, NOT_UNDERSTOOD_TEXT).await;
                }
            }
        }
        sent
    }

    async fn send_generated_image(&self, to: &str, prompt: &str) {
        info!("Generating image for {}: {}", to, prompt);

        let delivered = match self.services.images.generate(prompt).await {
            Ok(Some(url)) => {
                let caption = format!("Generated image: {}", prompt);
                match self.channel.send_image(to, &url, Some(&caption)).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to send image to {}: {}", to, e);
                        false
                    }
                }
            }
            Ok(None) => {
                warn!("Image generation returned no image");
                false
            }
            Err(e) => {
                warn!("Image generation failed: {}", e);
                false
            }
        };

        if !delivered {
            self.send_or_log(to, IMAGE_FAILED_TEXT).await;
        }
    }

    async fn send_or_log(&self, to: &str, text: &str) {
        if let Err(e) = self.channel.send_text(to, text).await {
            warn!("Failed to send notice to {}: {}", to, e);
        }
    }
}
