use axum::extract::{Path, Query, State};
use axum::Json;
use inkbound_store::ProgressStore;
use inkbound_types::ProgressEntry;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitBody {
    url: String,
    email: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
pub struct SubmitQuery {
    url: String,
    email: String,
}

pub async fn submit(State(state): State<AppState>, Json(body): Json<SubmitBody>) -> Json<Value> {
    Json(submit_response(&state, body.email, body.url, body.content).await)
}

pub async fn submit_legacy(
    State(state): State<AppState>,
    Query(query): Query<SubmitQuery>,
) -> Json<Value> {
    Json(submit_response(&state, query.email, query.url, String::new()).await)
}

async fn submit_response(state: &AppState, email: String, url: String, content: String) -> Value {
    match state.pipeline.submit(email, url, content).await {
        Ok((id, message)) => json!({ "message": message, "id": id.to_string() }),
        Err(err) => json!({ "message": err.to_string() }),
    }
}

pub async fn status(State(state): State<AppState>, Path(raw_id): Path<String>) -> Json<Value> {
    let id = raw_id.strip_suffix(".json").unwrap_or(&raw_id);
    match state.store.get(id).await {
        Ok(Some(message)) => {
            let entry = ProgressEntry::new(message);
            Json(json!({ "message": entry.message, "done": entry.done() }))
        }
        _ => Json(json!({ "message": "No job with that ID found.", "done": true })),
    }
}

#[derive(Deserialize)]
pub struct InboundEmailToFull {
    #[serde(rename = "Email")]
    email: String,
}

#[derive(Deserialize)]
pub struct InboundEmail {
    #[serde(rename = "ToFull")]
    to_full: Vec<InboundEmailToFull>,
    #[serde(rename = "TextBody")]
    text_body: String,
}

pub async fn inbound(State(state): State<AppState>, Json(body): Json<InboundEmail>) -> &'static str {
    match extract_inbound_parts(&body) {
        Ok((email, url)) => {
            tracing::info!(%url, "email submission");
            let _ = state.pipeline.submit(email, url, String::new()).await;
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed extracting needed parts from inbound email");
        }
    }
    "ok"
}

fn extract_inbound_parts(email: &InboundEmail) -> anyhow::Result<(String, String)> {
    let recipient = email
        .to_full
        .first()
        .ok_or_else(|| anyhow::anyhow!("inbound email has no recipients"))?;
    let local_part = recipient
        .email
        .split('@')
        .next()
        .ok_or_else(|| anyhow::anyhow!("recipient address has no local part"))?;
    let decoded = hex::decode(local_part)?;
    let address = String::from_utf8(decoded)?;
    let url = email
        .text_body
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    Ok((address, url))
}

#[derive(Deserialize)]
pub struct Bounce {
    #[serde(rename = "MessageID")]
    message_id: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "CanActivate")]
    can_activate: bool,
}

pub async fn bounce(State(state): State<AppState>, Json(body): Json<Bounce>) -> &'static str {
    if let Err(err) = state
        .pipeline
        .handle_bounce(&body.message_id, &body.email, body.can_activate)
        .await
    {
        tracing::warn!(error = %err, "failed handling bounce notification");
    }
    "ok"
}

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let store = if state.store_reachable().await { "ok" } else { "unreachable" };
    Json(json!({
        "status": "ok",
        "store": store,
        "pipeline_inflight": state.pipeline.inflight(),
    }))
}

pub async fn not_found() -> Result<(), ApiError> {
    Err(ApiError::BadRequest("not found".to_string()))
}
