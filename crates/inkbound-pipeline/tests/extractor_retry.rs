mod common;

use std::sync::Arc;

use inkbound_pipeline::mail_gateway::SendOutcome;
use inkbound_pipeline::{Pipeline, PipelineConfig};
use inkbound_store::InMemoryStore;

#[tokio::test]
async fn transient_extractor_failures_are_retried_then_succeed() {
    let tmp = tempfile::tempdir().unwrap();
    let kindlegen = common::write_fake_kindlegen(tmp.path(), 1024);

    let extractor = Arc::new(
        common::StubExtractor::new("<p>x</p>", "A", "example.com").failing_first(2),
    );
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
    let pipeline = Pipeline::new(
        store.clone(),
        config,
        reqwest::Client::new(),
        extractor.clone(),
        mailer,
    );

    let (id, _) = pipeline
        .submit(
            "u@kindle.com".to_string(),
            "https://example.com/a".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    let final_message = common::wait_until_done(&store, &id.to_string()).await;
    assert_eq!(final_message, "All done! Grab your Kindle and hang tight!");
    assert_eq!(extractor.call_count(), 3);

    pipeline.shutdown().await;
}
