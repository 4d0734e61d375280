//! REST API route handlers.
//!
//! Request bodies are read leniently, one field at a time: a field that is
//! absent, `null`, or not a string takes its default, and the other fields
//! are still used. A body that is missing or not JSON reads as all
//! defaults. There is no validation layer, so an absent `agent_id` is
//! simply the empty identifier.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, error};

use conftable_store::{DEFAULT_MESSAGE_TYPE, DEFAULT_ROLE, StoreError};

use crate::state::AppState;

type ApiResponse = (StatusCode, Json<Value>);

/// A request body whose fields are read independently.
#[derive(Debug)]
pub struct BodyFields(Value);

impl BodyFields {
    /// Decode `body`, treating anything that is not JSON as an empty body.
    pub fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Self(value),
            Err(e) => {
                debug!(error = %e, "unreadable request body, using defaults");
                Self(Value::Null)
            }
        }
    }

    /// The string value of `key`, or `None` if it is absent or not a string.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(str::to_owned)
    }
}

fn store_failure(op: &'static str, err: StoreError) -> ApiResponse {
    error!(op, error = %err, "store operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": err.to_string() })),
    )
}

// ---------------------------------------------------------------------------
// GET /ping
// ---------------------------------------------------------------------------

/// Health check.
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Conference table is open" }))
}

// ---------------------------------------------------------------------------
// POST /join
// ---------------------------------------------------------------------------

pub async fn join(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    let fields = BodyFields::parse(&body);
    let agent_id = fields.text("agent_id").unwrap_or_default();
    let role = fields.text("role").unwrap_or_else(|| DEFAULT_ROLE.to_owned());

    match state.table.join(&agent_id, &role).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": format!("Agent {agent_id} joined as {role}"),
                "participants": receipt.participants,
            })),
        ),
        Err(e) => store_failure("join", e),
    }
}

// ---------------------------------------------------------------------------
// POST /post
// ---------------------------------------------------------------------------

pub async fn post(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    let fields = BodyFields::parse(&body);
    let agent_id = fields.text("agent_id").unwrap_or_default();
    let message = fields.text("message").unwrap_or_default();
    let kind = fields
        .text("type")
        .unwrap_or_else(|| DEFAULT_MESSAGE_TYPE.to_owned());

    match state.table.post(&agent_id, &message, &kind).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message_id": receipt.message_id,
                "total_messages": receipt.total_messages,
            })),
        ),
        Err(e) => store_failure("post", e),
    }
}

// ---------------------------------------------------------------------------
// GET /messages?since_id=N
// ---------------------------------------------------------------------------

/// Parse `since_id`, treating anything that is not an integer as 0.
/// Negative values select every message.
pub fn parse_since_id(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|v| v.max(0) as u64)
        .unwrap_or(0)
}

pub async fn messages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResponse {
    let since_id = parse_since_id(params.get("since_id").map(String::as_str));

    match state.table.messages_since(since_id).await {
        Ok(batch) => {
            debug!(since_id, returned = batch.total, "messages listed");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "messages": batch.messages,
                    "total": batch.total,
                })),
            )
        }
        Err(e) => store_failure("messages", e),
    }
}

// ---------------------------------------------------------------------------
// POST /conclude
// ---------------------------------------------------------------------------

pub async fn conclude(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    let fields = BodyFields::parse(&body);
    let agent_id = fields.text("agent_id").unwrap_or_default();
    let conclusion = fields.text("conclusion").unwrap_or_default();

    match state.table.conclude(&agent_id, &conclusion).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": format!("Agent {agent_id} concluded"),
            })),
        ),
        Err(e) => store_failure("conclude", e),
    }
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

pub async fn status(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.table.status().await {
        Ok(status) => (StatusCode::OK, Json(json!(status))),
        Err(e) => store_failure("status", e),
    }
}
