//! Liveness and readiness endpoints.
//!
//! Neither endpoint is rate limited or session-bound.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health - Always healthy while the process serves requests.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Medical Chatbot",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /ready - Readiness captured when the answering pipeline was built.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let status = if state.readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(state.readiness.to_json()))
}
