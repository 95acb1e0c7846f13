use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inkbound_pipeline::article_extractor::{ArticleExtractor, ExtractError, Extracted};
use inkbound_pipeline::mail_gateway::{MailError, MailGateway, SendEmailRequest, SendOutcome};

/// Writes a stand-in `kindlegen` shell script that produces a
/// `Tinderizer.mobi` of `mobi_bytes` length in its working directory.
pub fn write_fake_kindlegen(dir: &Path, mobi_bytes: usize) -> PathBuf {
    let script_path = dir.join("fake_kindlegen.sh");
    let script = format!(
        "#!/bin/sh\nhead -c {mobi_bytes} /dev/zero > Tinderizer.mobi\nexit 0\n"
    );
    std::fs::write(&script_path, script).expect("write fake kindlegen script");
    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();
    script_path
}

/// Extractor stub that always returns the same fixed article body.
pub struct StubExtractor {
    pub html: String,
    pub title: String,
    pub domain: String,
    pub calls: AtomicUsize,
    pub fail_first_n: usize,
}

impl StubExtractor {
    pub fn new(html: impl Into<String>, title: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            title: title.into(),
            domain: domain.into(),
            calls: AtomicUsize::new(0),
            fail_first_n: 0,
        }
    }

    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first_n = n;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleExtractor for StubExtractor {
    async fn extract(&self, _url: &str) -> Result<Extracted, ExtractError> {
        self.respond()
    }

    async fn extract_with_content(&self, _url: &str, _content: &str) -> Result<Extracted, ExtractError> {
        self.respond()
    }
}

impl StubExtractor {
    fn respond(&self) -> Result<Extracted, ExtractError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first_n {
            return Err(ExtractError::Request("simulated transient failure".to_string()));
        }
        Ok(Extracted {
            title: self.title.clone(),
            domain: self.domain.clone(),
            author: None,
            html: self.html.clone(),
        })
    }
}

#[derive(Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub attachment_filename: String,
}

/// Mail gateway stub that records every send and always reports a fixed outcome.
pub struct StubMailer {
    pub sent: Mutex<Vec<SentEmail>>,
    pub reactivate_calls: AtomicUsize,
    pub outcome: Mutex<SendOutcome>,
}

impl StubMailer {
    pub fn new(outcome: SendOutcome) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reactivate_calls: AtomicUsize::new(0),
            outcome: Mutex::new(outcome),
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailGateway for StubMailer {
    async fn send(&self, request: SendEmailRequest) -> Result<SendOutcome, MailError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: request.to,
            subject: request.subject,
            text_body: request.text_body,
            attachment_filename: request.attachment.filename,
        });
        Ok(self.outcome.lock().unwrap().clone())
    }

    async fn reactivate(&self, _email: &str, _can_activate: bool) -> Result<(), MailError> {
        self.reactivate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub async fn wait_until_done(store: &Arc<dyn inkbound_store::ProgressStore>, job_id: &str) -> String {
    for _ in 0..200 {
        if let Ok(Some(message)) = store.get(job_id).await {
            if inkbound_types::ProgressEntry::new(message.clone()).done() {
                return message;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }
    panic!("job {job_id} did not reach a terminal state in time");
}
