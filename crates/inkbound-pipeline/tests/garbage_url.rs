mod common;

use std::sync::Arc;

use inkbound_pipeline::mail_gateway::SendOutcome;
use inkbound_pipeline::{IntakeError, Pipeline, PipelineConfig};
use inkbound_store::InMemoryStore;

#[tokio::test]
async fn garbage_url_is_rejected_synchronously_and_blacklisted() {
    let tmp = tempfile::tempdir().unwrap();
    let kindlegen = common::write_fake_kindlegen(tmp.path(), 1024);

    let extractor = Arc::new(common::StubExtractor::new("<p>x</p>", "A", "example.com"));
    let mailer = Arc::new(common::StubMailer::new(SendOutcome::Sent {
        message_id: "m1".to_string(),
    }));
    let store: Arc<dyn inkbound_store::ProgressStore> = Arc::new(InMemoryStore::new());

    let config = PipelineConfig {
        tmp_dir: tmp.path().to_path_buf(),
        queue_size: 10,
        kindlegen_path: kindlegen.to_string_lossy().to_string(),
        from_address: "kindle@inkbound.example".to_string(),
    };
    let pipeline = Pipeline::new(store.clone(), config, reqwest::Client::new(), extractor, mailer);

    let result = pipeline
        .submit(
            "u@kindle.com".to_string(),
            "<not a url>".to_string(),
            String::new(),
        )
        .await;

    assert!(matches!(result, Err(IntakeError::BadUrl)));

    pipeline.shutdown().await;
}
