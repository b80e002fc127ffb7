use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    auth::CurrentUser,
    models::{GateStats, UserProfile},
    permissions::Permissions,
    rules::Category,
};

// --- Public Handlers ---
//
// None of these inspect the caller. Whether a request gets here at all is
// decided by the permission gate in front of the router.

/// index
///
/// [Public Route] Landing page. Allowed without an identity lookup while
/// root-is-public is set, whatever the Public list says.
pub async fn index() -> &'static str {
    "pathgate"
}

/// health
///
/// [Public Route] Liveness check for load balancers. Only reachable once
/// "/health" is Public-listed; `main` adds it at startup.
pub async fn health() -> &'static str {
    "ok"
}

/// login_page
///
/// [Public Route] Placeholder for the host's sign-in page ("/login" is seeded Public).
pub async fn login_page() -> &'static str {
    "login"
}

/// register_page
///
/// [Public Route] Placeholder for the host's sign-up page.
pub async fn register_page() -> &'static str {
    "register"
}

// --- User Handlers ---
//
// The gate does not enforce User prefixes. These handlers authenticate the
// caller themselves through `CurrentUser`, which answers 401 for anonymous
// requests.

/// get_me
///
/// [Authenticated Route] Profile of the calling user, resolved through the
/// gate's user state. `is_admin` reflects the stored role.
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// get_data
///
/// [Authenticated Route] Data owned by the caller. The demo keeps no data, so
/// the item list is always empty.
pub async fn get_data(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "owner": user.id, "items": [] }))
}

// --- Admin Handlers ---

/// get_admin_stats
///
/// [Admin Route] The rule table as currently configured, read from a snapshot
/// copy so no lock is held while serializing.
///
/// *Authorization*: no role check happens here. The gate has already asked
/// the user state and confirmed the caller is an admin, and "/admin" must be
/// Public-listed as well for the request to have been let through.
pub async fn get_admin_stats(State(perm): State<Permissions>) -> Json<GateStats> {
    let rules = perm.rules();
    Json(GateStats {
        admin_paths: rules.prefixes(Category::Admin).to_vec(),
        user_paths: rules.prefixes(Category::User).to_vec(),
        public_paths: rules.prefixes(Category::Public).to_vec(),
        root_is_public: rules.root_is_public(),
    })
}
