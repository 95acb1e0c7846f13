use inkbound_types::Job;
use tokio::sync::mpsc;

use crate::intake;
use crate::pipeline::StageCtx;

/// Re-queues the original job after a provider bounce notification,
/// idempotent on `(message_id)` already resolved and `(email, url)` already
/// resent within the marker TTL.
pub async fn handle(
    ctx: &StageCtx,
    extractor_tx: &mpsc::Sender<Job>,
    message_id: &str,
    email: &str,
    can_activate: bool,
) -> anyhow::Result<()> {
    let url = match ctx.message_index.url_for(message_id).await? {
        Some(url) => url,
        None => return Ok(()),
    };

    if ctx.resend.already_resent(email, &url).await? {
        return Ok(());
    }

    ctx.mailer.reactivate(email, can_activate).await?;
    ctx.resend.mark_resent(email, &url).await?;

    let _ = intake::submit(ctx, extractor_tx, email.to_string(), url, String::new()).await;
    Ok(())
}
