use std::sync::Arc;

use brain_core::Brain;
use database::Database;
use openai_brain::{DalleImageGenerator, OpenAiBrain, OpenAiConfig, WhisperTranscriber};
use orchestrator::{
    ConversationRegistry, ConversationStore, MemoryStore, RelayConfig, Services, SqliteStore,
};
use relay_server::{router, AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

async fn open_store(
    database_url: Option<&str>,
) -> Result<Arc<dyn ConversationStore>, Box<dyn std::error::Error>> {
    match database_url {
        Some(url) => {
            let database = Database::connect(url).await?;
            database.migrate().await?;
            Ok(Arc::new(SqliteStore::with_database(database)))
        }
        None => {
            warn!("RELAY_DATABASE_URL not set, conversations will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let server = ServerConfig::from_env()?;
    init_tracing(server.log_json);

    let relay = Arc::new(RelayConfig::from_env()?);
    let openai = OpenAiConfig::from_env()?;

    let brain: Arc<dyn Brain> = Arc::new(OpenAiBrain::new(openai.clone())?);
    let transcriber = Arc::new(WhisperTranscriber::new(openai.clone())?);
    let images = Arc::new(DalleImageGenerator::new(openai)?);
    info!("Chat backend: {} (model {})", brain.name(), relay.settings.options.model);

    let store = open_store(server.database_url.as_deref()).await?;
    let registry = Arc::new(ConversationRegistry::new(store, relay.max_conversations));
    let services = Services::new(brain, transcriber, images, &relay);

    let state = AppState::from_env(services, registry, relay)?;
    if !state.has_transport() {
        return Err("no transport configured: set Twilio or WhatsApp Cloud API credentials".into());
    }

    info!(addr = %server.addr, "Relay server listening");
    let listener = tokio::net::TcpListener::bind(server.addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
