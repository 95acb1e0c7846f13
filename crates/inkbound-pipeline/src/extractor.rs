use std::collections::HashMap;
use std::time::Duration;

use inkbound_types::{HtmlDoc, Job};

use crate::image::{localize_images, rewrite_img_srcs};
use crate::pipeline::{publish, StageCtx};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

pub async fn process(ctx: &StageCtx, mut job: Job) -> Result<Job, Job> {
    publish(ctx.store.as_ref(), &job.id_string(), "Extracting…").await;

    let extracted = match fetch_with_retry(ctx, &job).await {
        Some(extracted) => extracted,
        None => {
            job.fail("Sorry, extraction failed.");
            return Err(job);
        }
    };

    let mapping: HashMap<String, String> =
        localize_images(&ctx.http_client, &extracted.html, &job.work_root).await;
    let rewritten = match rewrite_img_srcs(&extracted.html, &mapping) {
        Ok(rewritten) => rewritten,
        Err(err) => {
            tracing::warn!(job_id = %job.id, error = %err, "image rewrite failed, using original body");
            extracted.html
        }
    };

    job.doc = Some(HtmlDoc::new(rewritten));
    job.title = extracted.title;
    job.domain = extracted.domain;
    if let Some(author) = extracted.author {
        job.author = author;
    }

    publish(ctx.store.as_ref(), &job.id_string(), "Extraction complete…").await;
    Ok(job)
}

async fn fetch_with_retry(
    ctx: &StageCtx,
    job: &Job,
) -> Option<crate::article_extractor::Extracted> {
    for attempt in 1..=MAX_ATTEMPTS {
        let result = if job.content.is_empty() {
            ctx.extractor.extract(&job.url).await
        } else {
            ctx.extractor.extract_with_content(&job.url, &job.content).await
        };

        match result {
            Ok(extracted) => return Some(extracted),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                tracing::warn!(job_id = %job.id, attempt, error = %err, "transient extraction failure, retrying");
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            Err(err) => {
                tracing::warn!(job_id = %job.id, attempt, error = %err, "extraction failed");
                return None;
            }
        }
    }
    None
}
