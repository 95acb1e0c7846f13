use crate::html_doc::HtmlDoc;
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Author byline shown when the extractor didn't report one.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Hex-encode the SHA-1 digest of the concatenation of `parts`.
///
/// Every part is fed into the same running digest, not hashed independently.
pub fn sha1_hex(parts: &[&str]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// The per-job working directory: `tmp_dir/sha1(url || id)`.
pub fn work_root_for(tmp_dir: &Path, url: &str, id: Uuid) -> PathBuf {
    tmp_dir.join(sha1_hex(&[url, &id.to_string()]))
}

/// The unit of work threaded through every pipeline stage.
///
/// A `Job` is owned by exactly one stage's task at a time: it moves from
/// Intake to Extractor to Packager to Converter to Mailer to Cleaner, never
/// shared by reference across stage boundaries.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub url: String,
    pub email: String,
    pub started_at: DateTime<Utc>,
    pub work_root: PathBuf,
    pub title: String,
    pub author: String,
    pub domain: String,
    pub doc: Option<HtmlDoc>,
    pub content: String,
    pub friendly_error: String,
}

impl Job {
    pub fn new(id: Uuid, url: String, email: String, content: String, work_root: PathBuf) -> Self {
        Self {
            id,
            url,
            email,
            started_at: Utc::now(),
            work_root,
            title: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            domain: String::new(),
            doc: None,
            content,
            friendly_error: String::new(),
        }
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn has_default_author(&self) -> bool {
        self.author == DEFAULT_AUTHOR
    }

    pub fn fail(&mut self, friendly: impl Into<String>) {
        self.friendly_error = friendly.into();
    }

    pub fn html_path(&self) -> PathBuf {
        self.work_root.join("Tinderizer.html")
    }

    pub fn mobi_path(&self) -> PathBuf {
        self.work_root.join("Tinderizer.mobi")
    }
}
