//! Axum router configuration with middleware.
//!
//! Session-bound routes (`/`, `/get`, `/history`, `/clear`, `/feedback`)
//! sit behind the application-wide rate limits and the session cookie
//! middleware; `/get` carries its own tighter budget on top. `/health`,
//! `/ready` and `/static/*` are neither limited nor session-bound.
//! Middleware on everything: CORS, tracing.

use std::path::Path;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::rate_limit;
use crate::http::session::session_middleware;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat = get(handlers::chat::chat)
        .post(handlers::chat::chat)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::chat_limits,
        ));

    let session_routes = Router::new()
        .route("/", get(handlers::index::index))
        .route("/get", chat)
        .route("/history", get(handlers::history::get_history))
        .route("/clear", post(handlers::history::clear_history))
        .route("/feedback", post(handlers::feedback::submit_feedback))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::default_limits,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .merge(session_routes);

    // Static assets are optional; skip the mount when the directory is absent.
    if let Some(dir) = state.config.server.static_dir.as_deref() {
        if Path::new(dir).is_dir() {
            router = router.nest_service("/static", ServeDir::new(dir));
            tracing::info!(path = %dir, "static file serving enabled");
        }
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
