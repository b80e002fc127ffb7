use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The gate itself: rule table and evaluator/middleware.
pub mod permissions;
pub mod rules;

// The user-state collaborator the gate consults, and its session tokens.
pub mod auth;
pub mod models;
pub mod user_state;

pub mod config;
pub mod error;

// Demo host application.
pub mod handlers;
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ConfigError, GateError, UserStateError};
pub use permissions::{
    DenyFn, Permissions, Stage, Verdict, default_deny, json_deny, permission_middleware,
};
pub use rules::{Category, PathMatch, RuleTable};
pub use user_state::{MemoryUserState, PostgresUserState, UserState, UserStateHandle};

/// AppState
///
/// Shared state of the demo host: the gate and the loaded configuration.
/// Handlers pull either half out through the `FromRef` impls below, so they
/// can take `State<Permissions>` or `State<AppConfig>` directly.
#[derive(Clone)]
pub struct AppState {
    pub perm: Permissions,
    pub config: AppConfig,
}

impl FromRef<AppState> for Permissions {
    fn from_ref(app_state: &AppState) -> Permissions {
        app_state.perm.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the demo routes behind the permission gate.
///
/// Layer order, innermost first:
/// 1. `permission_middleware` over the merged public, authenticated and admin
///    routers. It wraps the whole router rather than each route group, so
///    unknown paths are answered by the denial responder (default-deny)
///    instead of a 404.
/// 2. `SetRequestIdLayer` / `TraceLayer` / `PropagateRequestIdLayer`: every
///    request, denied ones included, gets an `x-request-id` and a span from
///    `trace_span_logger`, and the id is echoed on the response.
/// 3. `CorsLayer`, outermost, so preflight requests are answered before the
///    gate sees them.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");
    let gate = state.perm.clone();

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .nest("/admin", admin::admin_routes())
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, permission_middleware));

    // Request ids and tracing sit outside the gate so denials are logged too.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its x-request-id. The gate's `debug!`
/// decision events are recorded inside this span.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
