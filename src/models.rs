use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role string that marks an administrator.
pub const ADMIN_ROLE: &str = "admin";

/// User
///
/// The identity record a user-state store resolves a request to.
/// Backed by the `profiles` table in Postgres, or held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // 'admin' or anything else; only admin/non-admin is distinguished.
    pub role: String,
}

impl User {
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// UserProfile
///
/// Response body for `GET /profiles/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let is_admin = user.is_admin();
        Self {
            id: user.id,
            email: user.email,
            is_admin,
        }
    }
}

/// GateStats
///
/// Response body for `GET /admin/stats`: the rule table as currently configured.
#[derive(Debug, Serialize, Deserialize)]
pub struct GateStats {
    pub admin_paths: Vec<String>,
    pub user_paths: Vec<String>,
    pub public_paths: Vec<String>,
    pub root_is_public: bool,
}
