//! Keyed registry of live conversations.

use std::sync::Arc;

use brain_core::Sender;
use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::config::RelayConfig;
use crate::conversation::{today, Conversation};
use crate::error::OrchestratorError;
use crate::store::ConversationStore;

/// Shared handle to one conversation. Holding the lock serializes turns.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// In-process map from channel address to conversation, backed by a store.
///
/// Lookups hit the cache first, then the backend, and otherwise create a
/// fresh conversation. The cache is bounded: once it holds more than
/// `max_senders` entries the least recently used idle conversations are
/// dropped (they stay in the backend). Conversations with a turn in
/// progress are never evicted.
pub struct ConversationRegistry {
    conversations: RwLock<IndexMap<String, ConversationHandle>>,
    store: Arc<dyn ConversationStore>,
    max_senders: usize,
}

impl ConversationRegistry {
    /// Create a registry over the given store.
    pub fn new(store: Arc<dyn ConversationStore>, max_senders: usize) -> Self {
        Self {
            conversations: RwLock::new(IndexMap::new()),
            store,
            max_senders,
        }
    }

    /// Name of the backing store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Return the conversation for `sender`, creating it if unseen.
    ///
    /// Repeated calls for the same address return the same handle while it
    /// stays cached. Store load failures propagate.
    pub async fn get_or_create(
        &self,
        sender: &Sender,
        defaults: &RelayConfig,
    ) -> Result<ConversationHandle, OrchestratorError> {
        if let Some(handle) = self.touch(&sender.address).await {
            return Ok(handle);
        }

        let today = today();
        let conversation = match self.store.load(&sender.address).await? {
            Some(snapshot) => {
                debug!(
                    "Restored conversation for {} ({} messages)",
                    sender.address,
                    snapshot.messages.len()
                );
                Conversation::restore(snapshot, sender.clone(), defaults, &today)
            }
            None => {
                debug!("Creating conversation for {}", sender.address);
                Conversation::new(sender.clone(), defaults, &today)
            }
        };

        let mut conversations = self.conversations.write().await;

        // Another turn may have inserted it while we were loading.
        if let Some(existing) = conversations.shift_remove(&sender.address) {
            conversations.insert(sender.address.clone(), existing.clone());
            return Ok(existing);
        }

        let handle = Arc::new(Mutex::new(conversation));
        conversations.insert(sender.address.clone(), handle.clone());
        Self::evict(&mut conversations, self.max_senders);

        Ok(handle)
    }

    /// Persist a conversation. Failures are logged, not returned.
    pub async fn save(&self, conversation: &Conversation) {
        if let Err(err) = self.store.save(&conversation.snapshot()).await {
            warn!(
                "Failed to save conversation for {}: {}",
                conversation.address(),
                err
            );
        }
    }

    /// Number of cached conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Look up a cached handle and mark it most recently used.
    async fn touch(&self, address: &str) -> Option<ConversationHandle> {
        let mut conversations = self.conversations.write().await;
        let handle = conversations.shift_remove(address)?;
        conversations.insert(address.to_string(), handle.clone());
        Some(handle)
    }

    /// Drop least recently used idle entries until within the limit.
    fn evict(conversations: &mut IndexMap<String, ConversationHandle>, max_senders: usize) {
        let mut index = 0;
        while conversations.len() > max_senders && index < conversations.len() {
            let idle = conversations
                .get_index(index)
                .map(|(_, handle)| Arc::strong_count(handle) == 1 && handle.try_lock().is_ok())
                .unwrap_or(false);

            if idle {
                if let Some((address, _)) = conversations.shift_remove_index(index) {
                    debug!("Evicted conversation for {}", address);
                }
            } else {
                index += 1;
            }
        }
    }
}
