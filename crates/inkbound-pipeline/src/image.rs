use std::collections::HashMap;
use std::path::Path;

use futures::future::join_all;
use inkbound_types::sha1_hex;
use lol_html::{element, HtmlRewriter, Settings};
use scraper::{Html, Selector};
use tokio::io::AsyncWriteExt;

/// Every distinct `<img src>` found in `html`, in document order, deduplicated.
fn collect_img_srcs(html: &str) -> Vec<String> {
    let selector = Selector::parse("img").expect("static selector is valid");
    let document = Html::parse_fragment(html);
    let mut seen = std::collections::HashSet::new();
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("src").map(str::to_string))
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

/// Downloads every `<img>` referenced in `html` into `work_root`, renaming
/// each to `sha1_hex(src) + ".jpg"`. A failed download is logged and skipped;
/// it never fails the job.
pub async fn localize_images(
    client: &reqwest::Client,
    html: &str,
    work_root: &Path,
) -> HashMap<String, String> {
    let srcs = collect_img_srcs(html);

    let downloads = srcs.into_iter().map(|src| {
        let client = client.clone();
        let work_root = work_root.to_path_buf();
        async move {
            let altered = format!("{}.jpg", sha1_hex(&[src.as_str()]));
            match download_one(&client, &src, &work_root.join(&altered)).await {
                Ok(()) => Some((src, altered)),
                Err(err) => {
                    tracing::warn!(src = %src, error = %err, "image download failed, leaving src unrewritten");
                    None
                }
            }
        }
    });

    join_all(downloads).await.into_iter().flatten().collect()
}

async fn download_one(client: &reqwest::Client, src: &str, dest: &Path) -> anyhow::Result<()> {
    let response = client
        .get(src)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?
        .error_for_status()?;
    let bytes = response.bytes().await?;
    let mut file = tokio::fs::File::create(dest).await?;
    file.write_all(&bytes).await?;
    Ok(())
}

/// Rewrites every `<img src>` in `html` using `mapping` (full URL -> on-disk
/// filename), leaving unmapped images untouched.
pub fn rewrite_img_srcs(html: &str, mapping: &HashMap<String, String>) -> anyhow::Result<String> {
    let mut output = Vec::new();
    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        if let Some(altered) = mapping.get(&src) {
                            el.set_attribute("src", altered)?;
                        }
                    }
                    Ok(())
                })],
                ..Settings::default()
            },
            |chunk: &[u8]| output.extend_from_slice(chunk),
        );
        rewriter.write(html.as_bytes())?;
        rewriter.end()?;
    }
    Ok(String::from_utf8(output)?)
}
