use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::state::AppState;

/// Redirects non-canonical GET requests to the configured canonical host,
/// leaving AJAX endpoints and non-GET requests untouched.
pub async fn canonical_host_redirect(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let canonical = state.canonical_host.as_str();

    let is_ajax = req.uri().path().starts_with("/ajax");
    let is_get = req.method() == Method::GET;
    let host_matches = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        == Some(canonical);

    if is_ajax || !is_get || host_matches {
        return next.run(req).await;
    }

    let target = match req.uri().path_and_query() {
        Some(path_and_query) => format!("http://{canonical}{path_and_query}"),
        None => format!("http://{canonical}{}", req.uri().path()),
    };
    Redirect::permanent(&target).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn router_with_canonical_host(canonical_host: &str) -> Router {
        let tmp = tempfile::tempdir().unwrap();
        let args = crate::config::Args {
            port: 0,
            bind_host: "127.0.0.1".to_string(),
            queue_size: 10,
            tmp_dir: Some(tmp.path().to_path_buf()),
            kindlegen_path: "kindlegen".to_string(),
        };
        let mut config = crate::config::AppConfig::load(args).unwrap();
        config.canonical_host = canonical_host.to_string();
        let state = crate::state::AppState::new(&config).await.unwrap();

        Router::new()
            .route("/page", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                canonical_host_redirect,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn non_canonical_get_is_redirected() {
        let app = router_with_canonical_host("tinderizer.example").await;
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/page")
                    .header("host", "other.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "http://tinderizer.example/page"
        );
    }

    #[tokio::test]
    async fn canonical_host_passes_through() {
        let app = router_with_canonical_host("tinderizer.example").await;
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/page")
                    .header("host", "tinderizer.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
