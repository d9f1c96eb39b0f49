//! Database models.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::Result;

/// A persisted conversation, keyed by channel address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoredConversation {
    /// Channel address (e.g. "whatsapp:+15551234567")
    pub address: String,
    /// Sender display name at the last save
    pub sender_name: String,
    /// Detected reply language, if any
    pub language: Option<String>,
    /// Transcript as a JSON array
    pub messages: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl StoredConversation {
    /// Decode the stored transcript.
    pub fn decode_messages<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        Ok(serde_json::from_str(&self.messages)?)
    }
}
