use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable by anonymous callers under the default rules.
/// "/health" is not in the default Public list; the host adds it at startup.
///
/// Access Control:
/// Nothing in this router checks identity. Removing a prefix from the Public
/// list (`Permissions::set_path`) closes the matching route here without any
/// change to the router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET / (always allowed while root-is-public is set)
        .route("/", get(handlers::index))
        // GET /health
        // Liveness check; Public-listed by `main`, denied otherwise.
        .route("/health", get(handlers::health))
        // GET /login
        .route("/login", get(handlers::login_page))
        // GET /register
        .route("/register", get(handlers::register_page))
}
