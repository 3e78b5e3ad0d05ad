//! Session issuance: approved login -> opaque bearer credential.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, SessionClaims, TokenValidationError};
use crate::Account;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("failed to issue session token: {0}")]
    Issue(String),

    #[error("malformed or forged session token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Window(#[from] TokenValidationError),
}

/// Turns an approved login into a bearer credential, and back.
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<String, SessionError>;

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError>;
}

/// HS256 JWT issuer.
pub struct JwtSessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtSessionIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl core::fmt::Debug for JwtSessionIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtSessionIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = SessionClaims::for_account(account, now, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Issue(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        // The time window is checked against the caller's clock below.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
