//! Per-client request budgets.
//!
//! Two middleware functions share one limiter: [`default_limits`] covers
//! every rate-limited route, [`chat_limits`] is layered on the chat route
//! only. Clients are keyed by their remote IP address.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use medibot_core::ratelimit::RateLimiter;
use medibot_types::ratelimit::{RateLimitDecision, RateLimitRule};

use crate::http::error::AppError;
use crate::state::AppState;

/// Used when the connection address is unknown (e.g. in-process requests).
const FALLBACK_CLIENT: &str = "127.0.0.1";

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| FALLBACK_CLIENT.to_string())
}

/// Count one hit against each rule, stopping at the first exhausted one.
///
/// Limiter failures let the request through.
async fn enforce(
    limiter: &impl RateLimiter,
    client: &str,
    rules: &[RateLimitRule],
) -> Result<(), AppError> {
    for rule in rules {
        match limiter.hit(client, rule).await {
            Ok(RateLimitDecision::Allowed { .. }) => {}
            Ok(RateLimitDecision::Limited { retry_after }) => {
                warn!(client, %rule, "rate limit exceeded");
                return Err(AppError::RateLimited {
                    rule: *rule,
                    retry_after,
                });
            }
            Err(e) => error!(client, %rule, error = %e, "rate limiter failed"),
        }
    }
    Ok(())
}

async fn limit_with(
    state: &AppState,
    rules: &[RateLimitRule],
    request: Request,
    next: Next,
) -> Response {
    if state.config.rate_limit.enabled {
        let client = client_key(&request);
        if let Err(e) = enforce(state.rate_limiter.as_ref(), &client, rules).await {
            return e.into_response();
        }
    }
    next.run(request).await
}

/// Application-wide budgets.
pub async fn default_limits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    limit_with(&state, &state.config.rate_limit.default_limits, request, next).await
}

/// Additional budget for the chat endpoint.
pub async fn chat_limits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    limit_with(&state, &state.config.rate_limit.chat_limits, request, next).await
}
