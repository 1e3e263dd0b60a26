//! Shared HTTP plumbing for the external collaborators.

use std::time::Duration;

use medibot_types::rag::RagError;
use reqwest::{Response, StatusCode};

/// Build a client with the configured per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, RagError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RagError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })
}

/// Map a transport failure.
pub fn request_failed(e: reqwest::Error) -> RagError {
    RagError::Provider {
        message: format!("HTTP request failed: {e}"),
    }
}

/// Pass successful responses through; turn the rest into a [`RagError`].
pub async fn check_status(response: Response) -> Result<Response, RagError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after_ms = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000));
    let body = response.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RagError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => RagError::RateLimited { retry_after_ms },
        _ => RagError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    })
}

/// Decode a JSON body.
pub async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, RagError> {
    response
        .json()
        .await
        .map_err(|e| RagError::Deserialization(format!("failed to parse response: {e}")))
}
