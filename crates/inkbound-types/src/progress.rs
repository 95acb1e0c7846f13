use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the terminal vocabulary a progress message uses to signal "no more
/// updates are coming" — case-insensitively, anywhere in the string.
static DONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new("(?i:done|failed|limited|invalid|error|sorry)").expect("static regex is valid")
});

/// A single progress line as observed by a status poll.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProgressEntry {
    pub message: String,
}

impl ProgressEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether this message signals the job has reached a terminal state.
    pub fn done(&self) -> bool {
        DONE_REGEX.is_match(&self.message)
    }
}

/// TTL applied to progress entries.
pub const PROGRESS_TTL_SECS: u64 = 120;
