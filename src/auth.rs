use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::{error::UserStateError, models::User, permissions::Permissions};

/// Claims
///
/// Payload of the session token a user-state store hands out and later resolves.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the id of the user the session belongs to.
    pub sub: Uuid,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
}

/// issue_token
///
/// Signs an HS256 session token for `user_id`, valid for `ttl`.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + ttl.as_secs()) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// bearer_subject
///
/// Resolves the request head to the user id carried in its session token.
///
/// The token is read from `Authorization: Bearer <jwt>` and validated against
/// `secret` with expiry checking on. Any failure (no header, other scheme,
/// bad signature, expired) is reported as `Unauthenticated`; the cause is not
/// distinguished.
pub fn bearer_subject(parts: &Parts, secret: &str) -> Result<Uuid, UserStateError> {
    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(UserStateError::Unauthenticated)?;

    let mut validation = Validation::default();
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        UserStateError::Unauthenticated
    })?;

    Ok(data.claims.sub)
}

/// CurrentUser
///
/// Extractor resolving the caller through the gate's user state.
///
/// The permission gate only answers "admin or not"; handlers that need the
/// caller's record use this instead. Rejects with 401 when the user state
/// cannot resolve the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Permissions: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let perm = Permissions::from_ref(state);
        perm.user_state()
            .current_user(parts)
            .await
            .map(CurrentUser)
            .map_err(|e| {
                tracing::debug!(error = %e, "caller could not be resolved");
                StatusCode::UNAUTHORIZED
            })
    }
}
