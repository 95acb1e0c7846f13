use std::sync::Arc;

use inkbound_pipeline::{HttpArticleExtractor, HttpMailGateway, Pipeline, PipelineConfig};
use inkbound_store::{InMemoryStore, ProgressStore, RedisStore, SharedStore};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: SharedStore,
    pub canonical_host: String,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store: SharedStore = match &config.redis_url {
            Some(url) => {
                tracing::info!("using Redis-backed progress store");
                Arc::new(RedisStore::connect(url).await?)
            }
            None => {
                tracing::info!("using in-memory progress store");
                let store = Arc::new(InMemoryStore::new());
                inkbound_store::spawn_periodic_sweep(store.clone(), std::time::Duration::from_secs(60));
                store as SharedStore
            }
        };

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let extractor = Arc::new(HttpArticleExtractor::new(
            http_client.clone(),
            config.extractor_endpoint.clone(),
            config.extractor_token.clone(),
        ));
        let mailer = Arc::new(HttpMailGateway::new(
            http_client.clone(),
            config.mail_endpoint.clone(),
            config.mail_token.clone(),
        ));

        let pipeline_config = PipelineConfig {
            tmp_dir: config.tmp_dir.clone(),
            queue_size: config.queue_size,
            kindlegen_path: config.kindlegen_path.clone(),
            from_address: config.from_address.clone(),
        };

        let pipeline = Arc::new(Pipeline::new(
            store.clone(),
            pipeline_config,
            http_client,
            extractor,
            mailer,
        ));

        Ok(Self {
            pipeline,
            store,
            canonical_host: config.canonical_host.clone(),
        })
    }

    pub async fn store_reachable(&self) -> bool {
        self.store.get("healthz-probe").await.is_ok()
    }
}
