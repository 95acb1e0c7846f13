use std::time::Duration;

use crate::store::SharedStore;

/// TTL applied to a `message_id -> url` mapping.
const MESSAGE_ID_TTL: Duration = Duration::from_secs(60 * 60);

/// Records which URL a successfully sent message corresponds to, so a later
/// bounce notification for that `message_id` can re-queue the right job.
pub struct MessageIdIndex {
    store: SharedStore,
}

impl MessageIdIndex {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn record(&self, message_id: &str, url: &str) -> anyhow::Result<()> {
        self.store.set(message_id, url, MESSAGE_ID_TTL).await
    }

    pub async fn url_for(&self, message_id: &str) -> anyhow::Result<Option<String>> {
        self.store.get(message_id).await
    }
}
