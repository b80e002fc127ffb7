use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Endpoints under the User prefixes. The gate does not check user rights, so
/// these are only reachable when their prefixes are also Public-listed; the
/// handlers then resolve the caller with `CurrentUser` and answer 401 for
/// anonymous requests.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /profiles/me
        // Returns the caller's profile, including the admin flag the gate uses.
        .route("/profiles/me", get(handlers::get_me))
        // GET /data
        // Returns the caller's (empty) data listing.
        .route("/data", get(handlers::get_data))
}
