//! Chat endpoint.
//!
//! GET/POST /get - Answer the `msg` form field (query string for GET, form
//! body for POST). Success is the plain-text answer; failures are JSON.
//! A POST without a form content type carries no fields, so it is answered
//! as an empty message.

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::Form;
use serde::Deserialize;
use tracing::{debug, error};

use crate::http::error::AppError;
use crate::http::session::ClientSession;
use crate::state::AppState;

/// Form fields accepted by the chat endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    pub msg: Option<String>,
}

/// GET/POST /get - Answer one question for the caller's session.
pub async fn chat(
    State(state): State<AppState>,
    ClientSession(session): ClientSession,
    form: Result<Form<ChatForm>, FormRejection>,
) -> Result<String, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(FormRejection::InvalidFormContentType(_)) => ChatForm::default(),
        Err(rejection) => {
            debug!(%session, error = %rejection, "undecodable chat form");
            return Err(AppError::InvalidRequest);
        }
    };

    let reply = state
        .chat_service
        .ask(&session, form.msg.as_deref())
        .await
        .inspect_err(|e| {
            if !e.is_client_error() {
                error!(%session, error = %e, "error processing chat request");
            }
        })?;

    Ok(reply.answer)
}
