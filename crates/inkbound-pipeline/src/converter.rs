use inkbound_types::Job;
use tokio::process::Command;

use crate::pipeline::{publish, StageCtx};

/// Invokes the external `kindlegen` binary and verifies its output the way
/// the process does: by checking for `Tinderizer.mobi`, not its exit code,
/// since kindlegen is known to return non-zero on warnings it still recovers
/// from.
pub async fn process(ctx: &StageCtx, mut job: Job) -> Result<Job, Job> {
    let output = Command::new(&ctx.config.kindlegen_path)
        .arg("Tinderizer.html")
        .current_dir(&job.work_root)
        .output()
        .await;

    match output {
        Ok(output) => {
            tracing::debug!(
                job_id = %job.id,
                status = %output.status,
                stdout = %String::from_utf8_lossy(&output.stdout),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "kindlegen finished"
            );
        }
        Err(err) => {
            tracing::warn!(job_id = %job.id, error = %err, "failed to spawn kindlegen");
        }
    }

    if tokio::fs::metadata(job.mobi_path()).await.is_err() {
        job.fail("Sorry, conversion failed.");
        return Err(job);
    }

    publish(ctx.store.as_ref(), &job.id_string(), "Optimization complete…").await;
    Ok(job)
}
