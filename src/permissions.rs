use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::RwLock;
use serde_json::json;
use std::{future::Future, sync::Arc};
use tracing::{debug, warn};

use crate::{
    error::{GateError, UserStateError},
    rules::{Category, PathMatch, RuleTable},
    user_state::{MemoryUserState, PostgresUserState, UserStateHandle},
};

/// DenyFn
///
/// Produces the response sent for a rejected request. Receives the request head.
pub type DenyFn = Arc<dyn Fn(&Parts) -> Response + Send + Sync>;

/// default_deny
///
/// 403 Forbidden with a fixed plain-text body.
pub fn default_deny(_parts: &Parts) -> Response {
    (StatusCode::FORBIDDEN, "Permission denied.").into_response()
}

/// json_deny
///
/// 403 Forbidden with a JSON error body, for API-only services.
pub fn json_deny(_parts: &Parts) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "permission denied" })),
    )
        .into_response()
}

/// Stage
///
/// One step of the decision procedure. The stages run in `Stage::PRECEDENCE`
/// order and the first stage that reaches a conclusion decides the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// "/" with root-is-public set: allowed without asking the user state.
    RootExempt,
    /// An Admin prefix matched: the caller must be an admin.
    AdminGate,
    /// Every principal has user rights, so this stage never concludes.
    UserGate,
    /// A Public prefix matched: allowed.
    PublicAllow,
    /// Nothing allowed the path: denied.
    DefaultDeny,
}

impl Stage {
    pub const PRECEDENCE: [Stage; 5] = [
        Stage::RootExempt,
        Stage::AdminGate,
        Stage::UserGate,
        Stage::PublicAllow,
        Stage::DefaultDeny,
    ];
}

/// Verdict
///
/// Outcome of evaluating one request, with the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub stage: Stage,
}

impl Verdict {
    pub fn allow(stage: Stage) -> Self {
        Self { allowed: true, stage }
    }

    pub fn deny(stage: Stage) -> Self {
        Self {
            allowed: false,
            stage,
        }
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}

/// decide
///
/// Runs the stage precedence over an already classified path.
///
/// `is_admin` is awaited once per matching Admin prefix and only while no
/// earlier answer was negative. An `Err` from it counts as "not admin"; it is
/// logged and otherwise dropped.
///
/// Passing the admin gate does not allow the request by itself: the path still
/// has to be Public-listed, otherwise `DefaultDeny` applies.
pub async fn decide<F, Fut>(matched: PathMatch, mut is_admin: F) -> Verdict
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, UserStateError>>,
{
    for stage in Stage::PRECEDENCE {
        match stage {
            Stage::RootExempt => {
                if matched.root_exempt {
                    return Verdict::allow(stage);
                }
            }
            Stage::AdminGate => {
                for _ in 0..matched.admin_hits {
                    let admin = match is_admin().await {
                        Ok(admin) => admin,
                        Err(e) => {
                            warn!(error = %e, "admin lookup failed, treating caller as non-admin");
                            false
                        }
                    };
                    if !admin {
                        return Verdict::deny(stage);
                    }
                }
            }
            Stage::UserGate => {}
            Stage::PublicAllow => {
                if matched.public_hit {
                    return Verdict::allow(stage);
                }
            }
            Stage::DefaultDeny => return Verdict::deny(stage),
        }
    }
    Verdict::deny(Stage::DefaultDeny)
}

struct Inner {
    state: UserStateHandle,
    rules: RwLock<RuleTable>,
    denied: RwLock<DenyFn>,
}

/// Permissions
///
/// The request-authorization gate. Holds the rule table, the denial responder
/// and a handle to the user-state store, and decides for every request whether
/// it may reach the application handlers.
///
/// Clones share the same configuration, so the gate can be passed as axum state.
/// Configuration is expected to be done before serving; mutators take a write
/// lock, so changing it under traffic is safe but not ordered against
/// in-flight requests.
#[derive(Clone)]
pub struct Permissions {
    inner: Arc<Inner>,
}

impl Permissions {
    /// A gate with the default rules, backed by a fresh in-memory user state.
    ///
    /// The store is only reachable through `user_state()` as a trait object,
    /// so no accounts can be added to it. Use `with_memory_store` when the
    /// caller needs to register users or hand out sessions.
    pub fn new() -> Result<Self, GateError> {
        Ok(Self::with_memory_store().0)
    }

    /// A gate with the default rules over a fresh in-memory user state, and a
    /// handle to that same store for managing its accounts.
    pub fn with_memory_store() -> (Self, Arc<MemoryUserState>) {
        let store = Arc::new(MemoryUserState::new());
        (Self::from_user_state(store.clone()), store)
    }

    /// A gate with the default rules, backed by the Postgres store at `locator`.
    pub async fn with_config(locator: &str, jwt_secret: &str) -> Result<Self, GateError> {
        if locator.trim().is_empty() {
            return Err(GateError::Config("empty user state locator".to_string()));
        }
        let store = PostgresUserState::connect(locator, jwt_secret).await?;
        Ok(Self::from_user_state(Arc::new(store)))
    }

    pub fn from_user_state(state: UserStateHandle) -> Self {
        Self::with_rules(state, RuleTable::default())
    }

    pub fn with_rules(state: UserStateHandle, rules: RuleTable) -> Self {
        let denied: DenyFn = Arc::new(default_deny);
        Self {
            inner: Arc::new(Inner {
                state,
                rules: RwLock::new(rules),
                denied: RwLock::new(denied),
            }),
        }
    }

    pub fn set_deny_func(&self, f: DenyFn) {
        *self.inner.denied.write() = f;
    }

    pub fn deny_func(&self) -> DenyFn {
        self.inner.denied.read().clone()
    }

    pub fn user_state(&self) -> UserStateHandle {
        self.inner.state.clone()
    }

    /// Appends a path prefix to `category`.
    pub fn add_path(&self, category: Category, prefix: impl Into<String>) {
        self.inner.rules.write().add_prefix(category, prefix);
    }

    /// Replaces every path prefix of `category`.
    pub fn set_path<I, S>(&self, category: Category, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.rules.write().set_prefixes(category, prefixes);
    }

    /// Clears the Admin and User prefixes. Public prefixes stay as they are.
    pub fn reset(&self) {
        self.inner.rules.write().reset();
    }

    pub fn set_root_is_public(&self, value: bool) {
        self.inner.rules.write().set_root_is_public(value);
    }

    pub fn root_is_public(&self) -> bool {
        self.inner.rules.read().root_is_public()
    }

    /// A copy of the current rule table.
    pub fn rules(&self) -> RuleTable {
        self.inner.rules.read().clone()
    }

    /// Evaluates `path` with an explicit admin lookup.
    pub async fn evaluate_path<F, Fut>(&self, path: &str, is_admin: F) -> Verdict
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, UserStateError>>,
    {
        // classify under the read lock, release it before awaiting the store
        let matched = self.inner.rules.read().snapshot(path);
        let verdict = decide(matched, is_admin).await;
        debug!(path, stage = ?verdict.stage, allowed = verdict.allowed, "permission verdict");
        verdict
    }

    /// Evaluates a request head, asking the user state about the caller.
    pub async fn evaluate(&self, parts: &Parts) -> Verdict {
        let state = &self.inner.state;
        self.evaluate_path(parts.uri.path(), || state.is_current_user_admin(parts))
            .await
    }

    pub async fn rejected(&self, parts: &Parts) -> bool {
        self.evaluate(parts).await.is_denied()
    }

    /// handle
    ///
    /// The middleware step. A rejected request is answered by the current
    /// `DenyFn` and `next` is never run; otherwise the request goes on to `next`.
    pub async fn handle(&self, request: Request, next: Next) -> Response {
        let (parts, body) = request.into_parts();
        if self.rejected(&parts).await {
            let deny = self.deny_func();
            return deny(&parts);
        }
        next.run(Request::from_parts(parts, body)).await
    }
}

/// permission_middleware
///
/// Adapter for `axum::middleware::from_fn_with_state`.
pub async fn permission_middleware(
    State(perm): State<Permissions>,
    request: Request,
    next: Next,
) -> Response {
    perm.handle(request, next).await
}
