use inkbound_types::{normalize_url, work_root_for, Job, NormalizeError};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::pipeline::{publish, StageCtx};

// No `NoKey` variant: id generation below is `Uuid::new_v4()`, which returns
// `Uuid` rather than `Result<Uuid, _>` and has no failure path to surface.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Sorry, but this URL doesn't look like it'll work.")]
    BadUrl,
    #[error("Sorry, but this URL has proven to not work…")]
    Blacklisted,
    #[error("Sorry, we couldn't start working on that article.")]
    NoWorkDir,
    #[error("the pipeline is shutting down")]
    ShuttingDown,
}

/// `submit` is the only synchronous entry point into the pipeline — it
/// either rejects the request outright or owns the job until it has been
/// handed to the Extractor queue.
pub async fn submit(
    ctx: &StageCtx,
    extractor_tx: &mpsc::Sender<Job>,
    email: String,
    url: String,
    content: String,
) -> Result<(Uuid, String), IntakeError> {
    let normalized = match normalize_url(&url) {
        Ok(normalized) => normalized,
        Err(NormalizeError::Parse) | Err(NormalizeError::UnsupportedScheme(_)) => {
            let _ = ctx.blacklist.insert(&url).await;
            return Err(IntakeError::BadUrl);
        }
    };

    if ctx
        .blacklist
        .contains(&normalized)
        .await
        .unwrap_or(false)
    {
        return Err(IntakeError::Blacklisted);
    }

    // infallible: no NoKey error path to generate here
    let id = Uuid::new_v4();
    let work_root = work_root_for(&ctx.config.tmp_dir, &normalized, id);
    tokio::fs::create_dir_all(&work_root)
        .await
        .map_err(|_| IntakeError::NoWorkDir)?;

    let job = Job::new(id, normalized, email, content, work_root);

    publish(ctx.store.as_ref(), &job.id_string(), "Working…").await;

    ctx.inflight
        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

    if extractor_tx.send(job).await.is_err() {
        ctx.inflight
            .fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
        return Err(IntakeError::ShuttingDown);
    }

    Ok((id, "Submitted! Hang tight…".to_string()))
}
