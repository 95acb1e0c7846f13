use chrono::SecondsFormat;
use inkbound_types::Job;

use crate::pipeline::{publish, StageCtx};

pub async fn process(ctx: &StageCtx, mut job: Job) -> Result<Job, Job> {
    publish(ctx.store.as_ref(), &job.id_string(), "Optimizing for Kindle…").await;

    let html = render(&job);
    if let Err(err) = tokio::fs::write(job.html_path(), html).await {
        tracing::warn!(job_id = %job.id, error = %err, "failed to write packaged HTML");
        job.fail("Sorry, conversion failed.");
        return Err(job);
    }

    Ok(job)
}

fn render(job: &Job) -> String {
    let body = job
        .doc
        .as_ref()
        .map(|doc| doc.render().to_string())
        .unwrap_or_default();

    let byline = if job.has_default_author() {
        format!("On {}", job.domain)
    } else {
        format!("By {} on {}", job.author, job.domain)
    };

    let timestamp = job.started_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="author" content="{author}">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<p class="byline">{byline}</p>
{body}
<footer>
<p>Sent from <a href="{url}">{url}</a> on {timestamp}.</p>
<p>If you find this useful, consider supporting the project that made it possible.</p>
</footer>
</body>
</html>
"#,
        author = job.author,
        title = job.title,
        byline = byline,
        body = body,
        url = job.url,
        timestamp = timestamp,
    )
}
