use async_trait::async_trait;
use axum::http::request::Parts;
use parking_lot::RwLock;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{collections::HashMap, sync::Arc, time::Duration};
use uuid::Uuid;

use crate::{
    auth::{bearer_subject, issue_token},
    error::UserStateError,
    models::{ADMIN_ROLE, User},
};

/// Lifetime of session tokens handed out by the stores.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// UserState
///
/// The narrow capability the permission gate consumes from the user-state
/// collaborator. Accounts, passwords and session storage stay behind this
/// trait; the gate only ever asks "is the caller an admin".
///
/// **Send + Sync + async_trait** keep `Arc<dyn UserState>` usable from axum's
/// multi-threaded handlers.
#[async_trait]
pub trait UserState: Send + Sync {
    /// Resolves the request head to the calling user.
    async fn current_user(&self, parts: &Parts) -> Result<User, UserStateError>;

    /// Reports whether the caller is an administrator.
    async fn is_current_user_admin(&self, parts: &Parts) -> Result<bool, UserStateError> {
        Ok(self.current_user(parts).await?.is_admin())
    }
}

/// UserStateHandle
///
/// Shared handle to a user-state store. The gate keeps one for its whole
/// lifetime; other client code may hold clones of the same store.
pub type UserStateHandle = Arc<dyn UserState>;

/// MemoryUserState
///
/// Process-local store. Users live in a map keyed by id and sessions are
/// HS256 tokens signed with the store's secret.
pub struct MemoryUserState {
    secret: String,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserState {
    /// A store with a random per-process signing secret.
    pub fn new() -> Self {
        Self::with_secret(Uuid::new_v4().simple().to_string())
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            users: RwLock::new(HashMap::new()),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn add_user(&self, user: User) -> Uuid {
        let id = user.id;
        self.users.write().insert(id, user);
        id
    }

    /// Flips the admin flag of a known user. Returns false if the user does not exist.
    pub fn set_admin(&self, id: Uuid, admin: bool) -> bool {
        match self.users.write().get_mut(&id) {
            Some(user) => {
                user.role = if admin { ADMIN_ROLE } else { "user" }.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_user(&self, id: Uuid) -> Option<User> {
        self.users.write().remove(&id)
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Issues a session token for a known user.
    pub fn issue_session(&self, id: Uuid) -> Result<String, UserStateError> {
        if !self.users.read().contains_key(&id) {
            return Err(UserStateError::UnknownUser(id));
        }
        issue_token(id, &self.secret, SESSION_TTL)
            .map_err(|e| UserStateError::Backend(e.to_string()))
    }
}

impl Default for MemoryUserState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserState for MemoryUserState {
    async fn current_user(&self, parts: &Parts) -> Result<User, UserStateError> {
        let id = bearer_subject(parts, &self.secret)?;
        self.user(id).ok_or(UserStateError::UnknownUser(id))
    }
}

/// PostgresUserState
///
/// Persistent store reading user records from the `profiles` table.
/// Sessions are the same HS256 bearer tokens as the in-memory store.
pub struct PostgresUserState {
    pool: PgPool,
    secret: String,
}

impl PostgresUserState {
    /// Opens a connection pool to the database named by `url`.
    pub async fn connect(url: &str, secret: impl Into<String>) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;
        Ok(Self::from_pool(pool, secret))
    }

    pub fn from_pool(pool: PgPool, secret: impl Into<String>) -> Self {
        Self {
            pool,
            secret: secret.into(),
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, UserStateError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserState for PostgresUserState {
    async fn current_user(&self, parts: &Parts) -> Result<User, UserStateError> {
        let id = bearer_subject(parts, &self.secret)?;
        self.get_user(id)
            .await?
            .ok_or(UserStateError::UnknownUser(id))
    }
}
