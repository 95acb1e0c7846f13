use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use inkbound_types::Job;

use crate::mail_gateway::{Attachment, SendEmailRequest, SendOutcome};
use crate::pipeline::{publish, StageCtx};

const MAX_MOBI_BYTES: u64 = 10 * 1024 * 1024;

pub async fn process(ctx: &StageCtx, mut job: Job) -> Result<Job, Job> {
    publish(ctx.store.as_ref(), &job.id_string(), "Sending to your Kindle…").await;

    let metadata = match tokio::fs::metadata(job.mobi_path()).await {
        Ok(metadata) => metadata,
        Err(_) => {
            job.fail("Sorry, email sending failed.");
            return Err(job);
        }
    };

    if metadata.len() > MAX_MOBI_BYTES {
        let _ = ctx.blacklist.insert(&job.url).await;
        job.fail("Sorry, this article is too big to send!");
        return Err(job);
    }

    let mobi_bytes = match tokio::fs::read(job.mobi_path()).await {
        Ok(bytes) => bytes,
        Err(_) => {
            job.fail("Sorry, email sending failed.");
            return Err(job);
        }
    };

    let request = SendEmailRequest {
        from: ctx.config.from_address.clone(),
        to: job.email.clone(),
        subject: "convert".to_string(),
        text_body: format!("Straight to your Kindle! {}: {}", job.title, job.url),
        attachment: Attachment {
            filename: "Tinderizer.mobi".to_string(),
            content_type: "application/octet-stream".to_string(),
            base64_content: BASE64.encode(mobi_bytes),
        },
    };

    let outcome = match ctx.mailer.send(request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(job_id = %job.id, error = %err, "mail gateway request failed");
            job.fail("Sorry, email sending failed.");
            return Err(job);
        }
    };

    match outcome {
        SendOutcome::Sent { message_id } => {
            if !message_id.is_empty() {
                let _ = ctx.message_index.record(&message_id, &job.url).await;
            }
            publish(
                ctx.store.as_ref(),
                &job.id_string(),
                "All done! Grab your Kindle and hang tight!",
            )
            .await;
            Ok(job)
        }
        SendOutcome::InvalidRecipient => {
            job.fail("Your email appears invalid. Please try carefully remaking the bookmarklet.");
            Err(job)
        }
        SendOutcome::RecipientDeactivated => {
            job.fail(format!(
                "Your Kindle is no longer accepting our emails. Please remove {} from your Kindle's approved senders and add it again, or contact support.",
                ctx.config.from_address
            ));
            Err(job)
        }
        SendOutcome::Rejected { provider_message } => {
            tracing::error!(
                job_id = %job.id,
                provider_message = %provider_message,
                error = "mail gateway rejected payload",
                "delivery rejected"
            );
            job.fail("Sorry, email sending failed.");
            Err(job)
        }
        SendOutcome::Other { code } => {
            tracing::warn!(job_id = %job.id, code, "unrecognized mail gateway result code");
            job.fail("Sorry, email sending failed.");
            Err(job)
        }
    }
}
