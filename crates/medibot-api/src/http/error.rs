//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{"error": "<message>"}`.

use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use medibot_types::error::ChatError;
use medibot_types::ratelimit::RateLimitRule;

/// Shown when the chat pipeline fails on the server side.
pub const GENERIC_ERROR: &str = "An error occurred while processing your request. Please try again.";

/// Shown when the request or the answering-service response is unusable.
pub const INVALID_REQUEST: &str = "Invalid request format";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The message failed validation.
    Validation(String),
    /// Undecodable form or malformed answering-service response.
    InvalidRequest,
    /// A request budget was exhausted.
    RateLimited {
        rule: RateLimitRule,
        retry_after: Duration,
    },
    /// Server-side failure; the message is safe to show the client.
    Internal(&'static str),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(v) => AppError::Validation(v.to_string()),
            ChatError::MalformedResponse(_) => AppError::InvalidRequest,
            ChatError::Upstream(_) | ChatError::Storage(_) => AppError::Internal(GENERIC_ERROR),
        }
    }
}

/// Whole seconds for a `Retry-After` header, rounded up.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidRequest => (StatusCode::BAD_REQUEST, INVALID_REQUEST.to_string()),
            AppError::RateLimited { rule, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                format!("Rate limit exceeded: {rule}"),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if let AppError::RateLimited { retry_after, .. } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs(retry_after)),
            );
        }
        response
    }
}
