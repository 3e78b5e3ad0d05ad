//! Root admin seeding.
//!
//! Runs once at startup. The root admin is the only account with
//! `is_root_admin = true`; if one already exists, or a live account already
//! holds the configured username or email, the seed is a no-op.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use gatekeep_auth::{CredentialError, CredentialVerifier, NewAccount};
use gatekeep_core::AccountId;

use crate::account_store::{AccountStore, StoreError};
use crate::config::RootAdminSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(AccountId),
    AlreadyPresent(AccountId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("failed to hash root admin password: {0}")]
    Credential(#[from] CredentialError),

    #[error("failed to store root admin: {0}")]
    Store(#[from] StoreError),
}

#[instrument(skip(store, credentials, settings, now), fields(username = %settings.username), err)]
pub fn seed_root_admin<S, C>(
    store: &S,
    credentials: &C,
    settings: &RootAdminSettings,
    default_avatar: &str,
    now: DateTime<Utc>,
) -> Result<SeedOutcome, SeedError>
where
    S: AccountStore,
    C: CredentialVerifier,
{
    if let Some(existing) = store.root_admin()? {
        info!(account_id = %existing.id, "root admin already present");
        return Ok(SeedOutcome::AlreadyPresent(existing.id));
    }

    let holder = store
        .holders_of(&settings.username, &settings.email)?
        .into_iter()
        .find(|a| !a.is_released());
    if let Some(holder) = holder {
        warn!(account_id = %holder.id, "root admin identifiers already held; not seeding");
        return Ok(SeedOutcome::AlreadyPresent(holder.id));
    }

    let credential_hash = credentials.hash(&settings.password)?;
    let account = gatekeep_auth::root_account(
        NewAccount {
            id: AccountId::new(),
            username: settings.username.clone(),
            email: settings.email.clone(),
            credential_hash,
            avatar: default_avatar.to_string(),
        },
        settings.role,
        settings.status,
        now,
    );

    let stored = store.insert(account)?;
    info!(account_id = %stored.id, role = %stored.role, "root admin created");
    Ok(SeedOutcome::Created(stored.id))
}
