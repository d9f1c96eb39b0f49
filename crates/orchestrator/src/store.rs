//! Durable conversation backends.

use std::collections::HashMap;

use async_trait::async_trait;
use brain_core::ChatMessage;
use database::{conversation as conversation_store, Database};
use tokio::sync::RwLock;

use crate::conversation::ConversationSnapshot;
use crate::error::OrchestratorError;

/// Backend that conversations are loaded from and saved to.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the conversation stored for `address`, if any.
    async fn load(&self, address: &str) -> Result<Option<ConversationSnapshot>, OrchestratorError>;

    /// Persist a conversation, replacing any previous state.
    async fn save(&self, snapshot: &ConversationSnapshot) -> Result<(), OrchestratorError>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, ConversationSnapshot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn load(&self, address: &str) -> Result<Option<ConversationSnapshot>, OrchestratorError> {
        Ok(self.conversations.read().await.get(address).cloned())
    }

    async fn save(&self, snapshot: &ConversationSnapshot) -> Result<(), OrchestratorError> {
        self.conversations
            .write()
            .await
            .insert(snapshot.address.clone(), snapshot.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// SQLite-backed store; the transcript is kept as a JSON column.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    /// Create a store over an already migrated database.
    pub fn with_database(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn load(&self, address: &str) -> Result<Option<ConversationSnapshot>, OrchestratorError> {
        let Some(record) = conversation_store::get_conversation(self.database.pool(), address).await?
        else {
            return Ok(None);
        };

        let messages = record.decode_messages::<ChatMessage>()?;
        Ok(Some(ConversationSnapshot {
            address: record.address,
            sender_name: record.sender_name,
            language: record.language,
            messages,
        }))
    }

    async fn save(&self, snapshot: &ConversationSnapshot) -> Result<(), OrchestratorError> {
        conversation_store::upsert_conversation(
            self.database.pool(),
            &snapshot.address,
            &snapshot.sender_name,
            snapshot.language.as_deref(),
            &snapshot.messages,
        )
        .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
