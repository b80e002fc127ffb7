use thiserror::Error;
use uuid::Uuid;

/// UserStateError
///
/// Failures reported by a user-state store while resolving the caller.
/// The permission gate never surfaces these: any of them means "not admin".
#[derive(Debug, Error)]
pub enum UserStateError {
    /// No usable session token was presented (missing header, wrong scheme, bad or expired JWT).
    #[error("no authenticated session")]
    Unauthenticated,
    /// The token was valid but names a user the store does not know.
    #[error("unknown user: {0}")]
    UnknownUser(Uuid),
    /// The backing store failed (connection, query, decoding).
    #[error("user state backend: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for UserStateError {
    fn from(e: sqlx::Error) -> Self {
        UserStateError::Backend(e.to_string())
    }
}

/// GateError
///
/// Construction-time failures of a `Permissions` gate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("user state store unavailable: {0}")]
    Store(#[from] sqlx::Error),
    #[error("invalid gate configuration: {0}")]
    Config(String),
}

/// ConfigError
///
/// Returned by `AppConfig::load` when the environment is incomplete or malformed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
