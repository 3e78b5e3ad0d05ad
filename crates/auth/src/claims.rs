use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekeep_core::AccountId;

use crate::Account;

/// Session token claims (transport-agnostic).
///
/// Mirrors what the session issuer encodes: identity, role and status as
/// their serialized strings, plus a unix-seconds validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / account identifier.
    pub sub: AccountId,

    pub username: String,
    pub email: String,

    /// Role string (`"USER"`, `"ADMIN"`, ...).
    pub role: String,

    /// Status string (`"active"`, ...).
    pub status: String,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiration, unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_account(account: &Account, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role.as_str().to_string(),
            status: account.status.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claims' time window.
///
/// Signature verification happens in the session issuer; this only looks at
/// `iat`/`exp` against `now`.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
