//! Cookie-backed client sessions.
//!
//! [`session_middleware`] reads the session cookie, mints a fresh id when it
//! is missing or unparseable, and stores the [`SessionId`] in the request
//! extensions. New ids are returned to the client with `Set-Cookie`.
//! Handlers take the id through the [`ClientSession`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use medibot_types::chat::SessionId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Find `name` among the request's `Cookie` headers.
fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

fn session_cookie(name: &str, id: &SessionId) -> String {
    format!("{name}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Attach a [`SessionId`] to every request passing through.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.as_str();

    let existing = read_cookie(request.headers(), cookie_name)
        .and_then(|value| value.parse::<SessionId>().ok());
    let (session, is_new) = match existing {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };
    if is_new {
        debug!(%session, "starting new session");
    }

    request.extensions_mut().insert(session);
    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&session_cookie(cookie_name, &session)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "could not encode session cookie"),
        }
    }
    response
}

/// The caller's session, as resolved by [`session_middleware`].
pub struct ClientSession(pub SessionId);

impl<S: Send + Sync> FromRequestParts<S> for ClientSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .map(ClientSession)
            .ok_or(AppError::Internal("Session unavailable"))
    }
}
