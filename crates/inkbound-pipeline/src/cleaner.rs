use inkbound_types::Job;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::pipeline::{publish, StageCtx};

/// Terminal stage: every job reaches here exactly once, whether it arrived
/// via a stage's success or error output.
pub async fn run(ctx: &StageCtx, mut rx: mpsc::Receiver<Job>) {
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        let ctx = ctx.clone();
        tasks.spawn(async move { clean_one(&ctx, job).await });
    }
    while tasks.join_next().await.is_some() {}
}

async fn clean_one(ctx: &StageCtx, job: Job) {
    if !job.friendly_error.is_empty() {
        publish(ctx.store.as_ref(), &job.id_string(), job.friendly_error.clone()).await;
    }

    if let Err(err) = tokio::fs::remove_dir_all(&job.work_root).await {
        tracing::debug!(job_id = %job.id, error = %err, "failed to remove work_root");
    }

    ctx.inflight
        .fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
}
