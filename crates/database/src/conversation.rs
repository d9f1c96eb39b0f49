//! Conversation persistence.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::StoredConversation;
use crate::Result;

/// Create or replace the stored conversation for an address.
pub async fn upsert_conversation<M: Serialize>(
    pool: &SqlitePool,
    address: &str,
    sender_name: &str,
    language: Option<&str>,
    messages: &[M],
) -> Result<()> {
    let encoded = serde_json::to_string(messages)?;

    sqlx::query(
        r#"
        INSERT INTO conversations (address, sender_name, language, messages)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(address) DO UPDATE SET
            sender_name = excluded.sender_name,
            language = excluded.language,
            messages = excluded.messages,
            updated_at = datetime('now')
        "#,
    )
    .bind(address)
    .bind(sender_name)
    .bind(language)
    .bind(encoded)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the stored conversation for an address.
pub async fn get_conversation(
    pool: &SqlitePool,
    address: &str,
) -> Result<Option<StoredConversation>> {
    let record = sqlx::query_as::<_, StoredConversation>(
        r#"
        SELECT address, sender_name, language, messages, created_at, updated_at
        FROM conversations
        WHERE address = ?
        "#,
    )
    .bind(address)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
