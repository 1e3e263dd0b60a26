//! Session history endpoints.
//!
//! - GET  /history - The caller's chat history, oldest first
//! - POST /clear   - Reset the caller's chat history

use axum::extract::State;
use axum::Json;
use serde_json::{Value, json};
use tracing::error;

use crate::http::error::AppError;
use crate::http::session::ClientSession;
use crate::state::AppState;

/// GET /history
pub async fn get_history(
    State(state): State<AppState>,
    ClientSession(session): ClientSession,
) -> Result<Json<Value>, AppError> {
    let history = state.chat_service.history(&session).await.map_err(|e| {
        error!(%session, error = %e, "error retrieving history");
        AppError::Internal("Could not retrieve history")
    })?;

    Ok(Json(json!({ "history": history })))
}

/// POST /clear - Idempotent; the feedback log is kept.
pub async fn clear_history(
    State(state): State<AppState>,
    ClientSession(session): ClientSession,
) -> Result<Json<Value>, AppError> {
    state.chat_service.clear_history(&session).await.map_err(|e| {
        error!(%session, error = %e, "error clearing history");
        AppError::Internal("Could not clear history")
    })?;

    Ok(Json(json!({ "message": "History cleared successfully" })))
}
