use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use inkbound_store::{Blacklist, MessageIdIndex, ProgressStore, ResendMarker, SharedStore};
use inkbound_types::{Job, ProgressEntry, PROGRESS_TTL_SECS};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::article_extractor::ArticleExtractor;
use crate::config::PipelineConfig;
use crate::intake::{self, IntakeError};
use crate::mail_gateway::MailGateway;
use crate::{bounce, cleaner, converter, extractor, mailer, packager};

/// Shared, cheaply-cloneable handle passed into every stage task.
#[derive(Clone)]
pub struct StageCtx {
    pub store: SharedStore,
    pub blacklist: Arc<Blacklist>,
    pub resend: Arc<ResendMarker>,
    pub message_index: Arc<MessageIdIndex>,
    pub config: Arc<PipelineConfig>,
    pub http_client: reqwest::Client,
    pub extractor: Arc<dyn ArticleExtractor>,
    pub mailer: Arc<dyn MailGateway>,
    pub inflight: Arc<AtomicI64>,
}

pub async fn publish(store: &dyn ProgressStore, job_id: &str, message: impl Into<String>) {
    let entry = ProgressEntry::new(message);
    if let Err(err) = store
        .set(
            job_id,
            &entry.message,
            std::time::Duration::from_secs(PROGRESS_TTL_SECS),
        )
        .await
    {
        tracing::warn!(job_id, error = %err, "failed to publish progress");
    }
}

/// The wired-up conversion pipeline: one bounded `mpsc` channel per moving
/// stage, each drained by a worker loop that spawns a task per job.
pub struct Pipeline {
    ctx: StageCtx,
    intake_tx: tokio::sync::Mutex<Option<mpsc::Sender<Job>>>,
    workers: tokio::sync::Mutex<Option<JoinSet<()>>>,
}

/// Runs a stage: receives jobs, spawns one task per job that calls `process`,
/// and routes the result to `next_tx` (success) or `cleaner_tx` (failure).
/// Exits once `rx` is closed and every spawned task has completed, matching
/// the per-stage drain-then-close shutdown contract.
async fn run_stage<F, Fut>(
    mut rx: mpsc::Receiver<Job>,
    next_tx: mpsc::Sender<Job>,
    cleaner_tx: mpsc::Sender<Job>,
    process: F,
) where
    F: Fn(Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Job, Job>> + Send + 'static,
{
    let process = Arc::new(process);
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        let process = process.clone();
        let next_tx = next_tx.clone();
        let cleaner_tx = cleaner_tx.clone();
        tasks.spawn(async move {
            match process(job).await {
                Ok(job) => {
                    let _ = next_tx.send(job).await;
                }
                Err(job) => {
                    let _ = cleaner_tx.send(job).await;
                }
            }
        });
    }
    while tasks.join_next().await.is_some() {}
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: SharedStore,
        config: PipelineConfig,
        http_client: reqwest::Client,
        extractor: Arc<dyn ArticleExtractor>,
        mailer: Arc<dyn MailGateway>,
    ) -> Self {
        let queue_size = config.queue_size;
        let ctx = StageCtx {
            blacklist: Arc::new(Blacklist::new(store.clone())),
            resend: Arc::new(ResendMarker::new(store.clone())),
            message_index: Arc::new(MessageIdIndex::new(store.clone())),
            store,
            config: Arc::new(config),
            http_client,
            extractor,
            mailer,
            inflight: Arc::new(AtomicI64::new(0)),
        };

        let (intake_tx, extractor_rx) = mpsc::channel(queue_size);
        let (packager_tx, packager_rx) = mpsc::channel(queue_size);
        let (converter_tx, converter_rx) = mpsc::channel(queue_size);
        let (mailer_tx, mailer_rx) = mpsc::channel(queue_size);
        let (cleaner_tx, cleaner_rx) = mpsc::channel(queue_size);

        let mut workers = JoinSet::new();

        {
            let ctx = ctx.clone();
            let cleaner_tx = cleaner_tx.clone();
            workers.spawn(run_stage(extractor_rx, packager_tx, cleaner_tx, move |job| {
                let ctx = ctx.clone();
                async move { extractor::process(&ctx, job).await }
            }));
        }
        {
            let ctx = ctx.clone();
            let cleaner_tx = cleaner_tx.clone();
            workers.spawn(run_stage(packager_rx, converter_tx, cleaner_tx, move |job| {
                let ctx = ctx.clone();
                async move { packager::process(&ctx, job).await }
            }));
        }
        {
            let ctx = ctx.clone();
            let cleaner_tx = cleaner_tx.clone();
            workers.spawn(run_stage(converter_rx, mailer_tx, cleaner_tx, move |job| {
                let ctx = ctx.clone();
                async move { converter::process(&ctx, job).await }
            }));
        }
        {
            let ctx = ctx.clone();
            let cleaner_tx_out = cleaner_tx.clone();
            let cleaner_tx_err = cleaner_tx.clone();
            workers.spawn(run_stage(mailer_rx, cleaner_tx_out, cleaner_tx_err, move |job| {
                let ctx = ctx.clone();
                async move { mailer::process(&ctx, job).await }
            }));
        }
        drop(cleaner_tx);
        {
            let ctx = ctx.clone();
            workers.spawn(async move {
                cleaner::run(&ctx, cleaner_rx).await;
            });
        }

        Self {
            ctx,
            intake_tx: tokio::sync::Mutex::new(Some(intake_tx)),
            workers: tokio::sync::Mutex::new(Some(workers)),
        }
    }

    /// Intake is synchronous from the caller's point of view: it either
    /// rejects the submission immediately or hands a new `Job` to the
    /// Extractor queue and returns its id.
    pub async fn submit(
        &self,
        email: String,
        url: String,
        content: String,
    ) -> Result<(Uuid, String), IntakeError> {
        let tx = self
            .intake_tx
            .lock()
            .await
            .clone()
            .ok_or(IntakeError::ShuttingDown)?;
        intake::submit(&self.ctx, &tx, email, url, content).await
    }

    pub async fn handle_bounce(
        &self,
        message_id: &str,
        email: &str,
        can_activate: bool,
    ) -> anyhow::Result<()> {
        let tx = self
            .intake_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| anyhow::anyhow!("pipeline is shutting down"))?;
        bounce::handle(&self.ctx, &tx, message_id, email, can_activate).await
    }

    pub fn inflight(&self) -> i64 {
        self.ctx.inflight.load(Ordering::Relaxed)
    }

    pub fn store(&self) -> &SharedStore {
        &self.ctx.store
    }

    /// Closes the Intake queue and waits for every stage to drain and quiesce.
    pub async fn shutdown(&self) {
        self.intake_tx.lock().await.take();
        if let Some(mut workers) = self.workers.lock().await.take() {
            while workers.join_next().await.is_some() {}
        }
    }
}
