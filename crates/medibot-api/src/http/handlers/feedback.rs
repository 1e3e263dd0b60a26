//! POST /feedback - Append a feedback record to the caller's session.
//!
//! Both fields are opaque and stored as sent; absent fields become `null`.

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use medibot_types::chat::FeedbackEntry;

use crate::http::error::AppError;
use crate::http::session::ClientSession;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackForm {
    pub feedback: Option<String>,
    pub timestamp: Option<String>,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    ClientSession(session): ClientSession,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(FormRejection::InvalidFormContentType(_)) => FeedbackForm::default(),
        Err(_) => return Err(AppError::InvalidRequest),
    };

    let entry = FeedbackEntry {
        kind: form.feedback,
        timestamp: form.timestamp,
    };
    state
        .chat_service
        .record_feedback(&session, entry)
        .await
        .map_err(|e| {
            error!(%session, error = %e, "error storing feedback");
            AppError::Internal("Could not store feedback")
        })?;

    Ok(Json(json!({ "message": "Feedback received" })))
}
