use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Nested under "/admin", the seeded Admin prefix.
///
/// Access Control:
/// The handlers perform no role check of their own. The permission gate asks
/// the user state whether the caller is an admin and denies otherwise. Passing
/// that check is not enough on its own: "/admin" must also be Public-listed,
/// or every request here falls through to the default deny.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // The current Admin / User / Public prefixes and the root-is-public flag.
        .route("/stats", get(handlers::get_admin_stats))
}
