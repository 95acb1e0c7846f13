pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use config::{AppConfig, Args};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ajax/submit.json", post(handlers::submit))
        .route("/ajax/submit.json", get(handlers::submit_legacy))
        .route("/ajax/status/:id", get(handlers::status))
        .route("/inbound", post(handlers::inbound))
        .route("/bounce", post(handlers::bounce))
        .route("/healthz", get(handlers::healthz))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::canonical_host_redirect,
        ))
        .with_state(state)
}
