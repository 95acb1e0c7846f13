use std::time::Duration;

use inkbound_types::sha1_hex;

use crate::store::SharedStore;

/// TTL applied to a blacklist entry.
const BLACKLIST_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Marks a URL or email address as off-limits for a day, after repeated
/// extraction failures or a mail-gateway bounce.
pub struct Blacklist {
    store: SharedStore,
}

impl Blacklist {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// `value` is either a normalized (or raw, unparseable) URL or an email
    /// address — both share this key space.
    pub async fn contains(&self, value: &str) -> anyhow::Result<bool> {
        Ok(self.store.get(&blacklist_key(value)).await?.is_some())
    }

    pub async fn insert(&self, value: &str) -> anyhow::Result<()> {
        self.store
            .set(&blacklist_key(value), "1", BLACKLIST_TTL)
            .await
    }
}

fn blacklist_key(value: &str) -> String {
    sha1_hex(&[value, ":blacklisted"])
}
