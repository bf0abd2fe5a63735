use std::sync::Arc;

use tracing::warn;

use anatomize_core::content::chat_intro;
use anatomize_core::model::{Message, Region};
use storage::keys::chat_history_key;
use storage::repository::{KeyValueStore, StorageError, get_json, set_json};

/// Per-region message history in the key-value store.
#[derive(Clone)]
pub struct ChatHistory {
    kv: Arc<dyn KeyValueStore>,
}

impl ChatHistory {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the history for `region`, seeding the intro message when there
    /// is nothing usable stored.
    ///
    /// A seeded history is written back unless the store could not be read
    /// at all, so existing data is never overwritten after a read failure.
    pub async fn load_or_seed(&self, region: Region) -> Vec<Message> {
        let key = chat_history_key(region);
        let persist_seed = match get_json::<Vec<Message>>(self.kv.as_ref(), &key).await {
            Ok(Some(messages)) if !messages.is_empty() => return messages,
            Ok(_) => true,
            Err(StorageError::Serialization(err)) => {
                warn!(%region, error = %err, "discarding malformed chat history");
                true
            }
            Err(err) => {
                warn!(%region, error = %err, "failed to load chat history");
                false
            }
        };

        let seeded = vec![Message::assistant(chat_intro(region))];
        if persist_seed {
            self.save(region, &seeded).await;
        }
        seeded
    }

    /// Persist `messages` for `region`. Failures are logged.
    pub async fn save(&self, region: Region, messages: &[Message]) {
        let key = chat_history_key(region);
        if let Err(err) = set_json(self.kv.as_ref(), &key, messages).await {
            warn!(%region, error = %err, "failed to persist chat history");
        }
    }

    /// Forget the stored history for `region`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    pub async fn clear(&self, region: Region) -> Result<(), StorageError> {
        self.kv.remove(&chat_history_key(region)).await
    }
}
