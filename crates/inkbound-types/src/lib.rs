pub mod html_doc;
pub mod job;
pub mod normalize;
pub mod progress;

pub use html_doc::HtmlDoc;
pub use job::{sha1_hex, work_root_for, Job, DEFAULT_AUTHOR};
pub use normalize::{normalize_url, NormalizeError};
pub use progress::{ProgressEntry, PROGRESS_TTL_SECS};
