//! Console relay example.
//!
//! Runs conversation turns from stdin through the orchestrator, printing
//! what the channel would send. Uses the echo brain, so no API keys are
//! needed.
//!
//! Run with: cargo run -p orchestrator --example console_relay
//!
//! Configuration via .env file or environment variables (all optional):
//!   CHAT_START_TEMPLATE - System prompt template
//!   AGENT_NAME          - Agent name for templates
//!   RUST_LOG            - Log filter (default: info)

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use mock_brain::{EchoBrain, StaticImageGenerator, StaticTranscriber};
use orchestrator::{
    Channel, ConversationRegistry, InboundMessage, MediaData, MediaRef, MemoryStore,
    Orchestrator, OrchestratorError, RelayConfig, Sender, Services,
};
use tracing_subscriber::EnvFilter;

/// Channel that prints outbound messages to stdout.
struct ConsoleChannel;

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn parse_inbound(&self, body: &[u8]) -> Result<Option<InboundMessage>, OrchestratorError> {
        let text = String::from_utf8_lossy(body).trim_end().to_string();
        Ok(Some(InboundMessage::text(
            Sender::new("console", Some("You".to_string())),
            text,
        )))
    }

    async fn send_text(&self, _to: &str, text: &str) -> Result<(), OrchestratorError> {
        println!("bot> {}", text);
        Ok(())
    }

    async fn send_image(
        &self,
        _to: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        println!("bot> [image {}] {}", image_url, caption.unwrap_or_default());
        Ok(())
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<MediaData, OrchestratorError> {
        Err(OrchestratorError::MediaUnavailable(media.location.clone()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(RelayConfig::from_env()?);
    let registry = Arc::new(ConversationRegistry::new(
        Arc::new(MemoryStore::new()),
        config.max_conversations,
    ));
    let services = Services::new(
        Arc::new(EchoBrain::with_prefix("You said: ")),
        Arc::new(StaticTranscriber::new("")),
        Arc::new(StaticImageGenerator::new("https://example.com/image.png")),
        &config,
    );
    let orchestrator = Orchestrator::new(ConsoleChannel, services, registry, config);

    println!("Type a message (\"bye\" ends the exchange, Ctrl-D quits).");
    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match orchestrator.handle_webhook(line.as_bytes()).await {
            Ok(outcome) => tracing::debug!("Turn outcome: {:?}", outcome),
            Err(e) => tracing::error!("Turn failed: {}", e),
        }
    }

    Ok(())
}
