use std::time::Duration;

use crate::store::SharedStore;

/// TTL applied to a resend marker.
const RESEND_TTL: Duration = Duration::from_secs(60 * 60);
const RESENT: &str = "resent";

/// Idempotence guard for bounce re-queueing: at most one resend per
/// `(email, url)` pair within the TTL window.
pub struct ResendMarker {
    store: SharedStore,
}

impl ResendMarker {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn already_resent(&self, email: &str, url: &str) -> anyhow::Result<bool> {
        Ok(self.store.get(&resend_key(email, url)).await? == Some(RESENT.to_string()))
    }

    pub async fn mark_resent(&self, email: &str, url: &str) -> anyhow::Result<()> {
        self.store
            .set(&resend_key(email, url), RESENT, RESEND_TTL)
            .await
    }
}

fn resend_key(email: &str, url: &str) -> String {
    format!("{email}{url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn unmarked_pair_has_not_been_resent() {
        let marker = ResendMarker::new(Arc::new(InMemoryStore::new()));
        assert!(!marker
            .already_resent("a@example.com", "https://ex.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn marked_pair_is_seen_as_resent() {
        let marker = ResendMarker::new(Arc::new(InMemoryStore::new()));
        marker
            .mark_resent("a@example.com", "https://ex.com")
            .await
            .unwrap();
        assert!(marker
            .already_resent("a@example.com", "https://ex.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn distinct_urls_for_same_email_do_not_collide() {
        let marker = ResendMarker::new(Arc::new(InMemoryStore::new()));
        marker
            .mark_resent("a@example.com", "https://ex.com/one")
            .await
            .unwrap();
        assert!(!marker
            .already_resent("a@example.com", "https://ex.com/two")
            .await
            .unwrap());
    }
}
