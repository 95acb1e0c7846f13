use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

/// Backing TTL key/value store for progress, blacklist and resend-marker state.
///
/// "Last write within TTL wins": a `set` always replaces whatever is there,
/// and readers never see an entry once its TTL has elapsed. There is no
/// cross-key transaction guarantee.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()>;
}

/// Default backing store when no `REDISTOGO_URL` / `MEMCACHIER_SERVERS` is configured.
///
/// Expiry is checked lazily on read; a background sweep also runs periodically
/// so abandoned keys don't accumulate forever.
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Drop every entry whose TTL has elapsed. Intended to be called from a
    /// periodic background task; harmless to call more or less often.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let now = Instant::now();
        let hit = self.entries.get(key).and_then(|entry| {
            let (value, expires_at) = entry.value();
            (*expires_at > now).then(|| value.clone())
        });
        Ok(hit)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
}

/// Redis-backed store, selected when `REDISTOGO_URL` is set.
///
/// `MultiplexedConnection` is cheap to clone and safe to share across tasks;
/// each call clones its own handle rather than holding a lock across an await.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ProgressStore for RedisStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }
}

/// In-process store used only by tests that want to assert on raw contents
/// without going through the `ProgressStore` trait object.
#[cfg(test)]
pub(crate) fn snapshot(store: &InMemoryStore) -> HashMap<String, String> {
    store
        .entries
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().0.clone()))
        .collect()
}

/// Shared handle used by collaborators that need to pick a store at startup
/// and hand the same instance to several subsystems.
pub type SharedStore = Arc<dyn ProgressStore>;

/// Spawns a task that calls `sweep` on an interval for the lifetime of the process.
pub fn spawn_periodic_sweep(store: Arc<InMemoryStore>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            store.sweep();
        }
    });
}
