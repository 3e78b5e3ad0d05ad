//! Credential hashing and verification (Argon2id, PHC strings).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("failed to hash secret: {0}")]
    HashingFailure(String),

    #[error("stored credential digest is corrupt: {0}")]
    CorruptDigest(String),
}

/// Hash a secret with a fresh random salt.
pub fn hash_secret(secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashingFailure(e.to_string()))
}

/// Check `secret` against a stored digest.
///
/// A mismatch is `Ok(false)`; only an unparseable digest is an error.
pub fn verify_secret(digest: &str, secret: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(digest).map_err(|e| CredentialError::CorruptDigest(e.to_string()))?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::CorruptDigest(e.to_string())),
    }
}

/// Injected credential collaborator.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, CredentialError>;

    fn verify(&self, digest: &str, secret: &str) -> Result<bool, CredentialError>;
}

/// Default Argon2id verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        hash_secret(secret)
    }

    fn verify(&self, digest: &str, secret: &str) -> Result<bool, CredentialError> {
        verify_secret(digest, secret)
    }
}
