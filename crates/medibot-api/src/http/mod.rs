//! HTTP layer for Medibot.
//!
//! Axum-based server for the chat page and its form endpoints, with cookie
//! sessions, per-client rate limits, CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod session;
