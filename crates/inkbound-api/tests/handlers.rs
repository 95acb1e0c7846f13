use axum::body::Body;
use axum::http::{Request, StatusCode};
use inkbound_api::config::{AppConfig, Args};
use inkbound_api::{build_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

async fn test_state(tmp_dir: &std::path::Path) -> AppState {
    let args = Args {
        port: 0,
        bind_host: "127.0.0.1".to_string(),
        queue_size: 10,
        tmp_dir: Some(tmp_dir.to_path_buf()),
        kindlegen_path: "kindlegen".to_string(),
    };
    let config = AppConfig::load(args).unwrap();
    AppState::new(&config).await.unwrap()
}

#[tokio::test]
async fn garbage_url_is_rejected_with_a_friendly_message() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ajax/submit.json")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"url": "<not a url>", "email": "u@kindle.com"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value["message"],
        "Sorry, but this URL doesn't look like it'll work."
    );
    assert!(value.get("id").is_none());
}

#[tokio::test]
async fn unknown_status_id_reports_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ajax/status/does-not-exist.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "No job with that ID found.");
    assert_eq!(value["done"], true);
}

#[tokio::test]
async fn healthz_reports_store_and_inflight() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["pipeline_inflight"], 0);
}
