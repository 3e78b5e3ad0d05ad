//! Account operations: load, decide, persist.
//!
//! Every mutating operation follows the same pipeline:
//!
//! ```text
//! 1. Load the requester (must have standing, see below)
//! 2. Load the target
//! 3. Ask the engine for the next state (pure)
//! 4. Save it conditionally on the version read in step 2
//! 5. On a version conflict, start over from step 1
//! ```
//!
//! Conflicts are retried up to `max_write_attempts` times; after that the
//! conflict is surfaced. The engine itself never retries.
//!
//! An active requester may act on any account the engine allows. A passive
//! requester may only act on its own account. Banned, frozen, deleted and
//! unknown requesters have no standing at all.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use gatekeep_auth::{
    Account, AccountStatus, AccountView, AdminProfile, Argon2Verifier, BanDuration,
    CredentialError, CredentialVerifier, Denial, DenialCategory, JwtSessionIssuer, NewAccount,
    ProfileChange, Requester, Role, SessionClaims, SessionError, SessionIssuer,
};
use gatekeep_core::{AccountId, ExpectedVersion};

use crate::account_store::{AccountStore, StoreError};
use crate::config::Settings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Denied(#[from] Denial),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ServiceError {
    /// Coarse category for transport mapping. `None` is an internal fault.
    pub fn category(&self) -> Option<DenialCategory> {
        match self {
            ServiceError::Denied(denial) => Some(denial.category()),
            ServiceError::Store(StoreError::NotFound) => Some(DenialCategory::NotFound),
            ServiceError::Store(StoreError::Conflict(_)) => Some(DenialCategory::Conflict),
            ServiceError::Store(StoreError::Unavailable(_)) => None,
            ServiceError::Credential(_) => None,
            ServiceError::Session(_) => Some(DenialCategory::Unauthorized),
        }
    }
}

/// A successful login: bearer token plus the public view of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub account: AccountView,
}

/// Account operations over an injected store, credential verifier and
/// session issuer.
pub struct AccountService<S, C = Argon2Verifier, I = JwtSessionIssuer> {
    store: S,
    credentials: C,
    sessions: I,
    settings: Settings,
}

impl<S> AccountService<S, Argon2Verifier, JwtSessionIssuer>
where
    S: AccountStore,
{
    /// Default wiring: Argon2id credentials and HS256 sessions from `settings`.
    pub fn with_defaults(store: S, settings: Settings) -> Self {
        let sessions = JwtSessionIssuer::new(settings.jwt_secret.as_bytes(), settings.session_ttl);
        Self::new(store, Argon2Verifier, sessions, settings)
    }
}

impl<S, C, I> AccountService<S, C, I>
where
    S: AccountStore,
    C: CredentialVerifier,
    I: SessionIssuer,
{
    pub fn new(store: S, credentials: C, sessions: I, settings: Settings) -> Self {
        Self {
            store,
            credentials,
            sessions,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    fn load_target(&self, id: AccountId) -> Result<Account, ServiceError> {
        match self.store.get(id) {
            Err(StoreError::NotFound) => Err(Denial::NotFound.into()),
            other => Ok(other?),
        }
    }

    /// The requester's account, freshly loaded, if it has standing to act on
    /// `target_id`.
    fn load_requester_account(
        &self,
        id: AccountId,
        target_id: AccountId,
    ) -> Result<Account, ServiceError> {
        let account = match self.store.get(id) {
            Err(StoreError::NotFound) => return Err(Denial::Unauthorized.into()),
            other => other?,
        };
        let standing = match account.status {
            AccountStatus::Active => true,
            AccountStatus::Passive => id == target_id,
            AccountStatus::Banned | AccountStatus::Frozen | AccountStatus::Deleted => false,
        };
        if !standing || account.is_released() {
            return Err(Denial::Unauthorized.into());
        }
        Ok(account)
    }

    fn load_requester(
        &self,
        id: AccountId,
        target_id: AccountId,
    ) -> Result<Requester, ServiceError> {
        self.load_requester_account(id, target_id)
            .map(|account| Requester::of(&account))
    }

    /// Read-decide-write on `target_id`, re-reading on version conflicts.
    fn transition<F>(
        &self,
        operation: &'static str,
        requester_id: AccountId,
        target_id: AccountId,
        decide: F,
    ) -> Result<Account, ServiceError>
    where
        F: Fn(&Requester, &Account) -> Result<Account, ServiceError>,
    {
        let mut attempt = 1;
        loop {
            let requester = self.load_requester(requester_id, target_id)?;
            let target = self.load_target(target_id)?;

            let next = decide(&requester, &target).inspect_err(|e| {
                warn!(
                    operation,
                    requester_id = %requester_id,
                    target_id = %target_id,
                    error = %e,
                    "account change denied"
                );
            })?;

            match self.store.save(next, ExpectedVersion::of(&target)) {
                Ok(saved) => {
                    info!(
                        operation,
                        requester_id = %requester_id,
                        target_id = %target_id,
                        role = %saved.role,
                        status = %saved.status,
                        version = saved.version,
                        "account updated"
                    );
                    return Ok(saved);
                }
                Err(StoreError::Conflict(reason)) if attempt < self.settings.max_write_attempts => {
                    debug!(
                        operation,
                        target_id = %target_id,
                        attempt,
                        %reason,
                        "write conflict; retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration & login
    // ─────────────────────────────────────────────────────────────────────────

    #[instrument(skip(self, password, now), err)]
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AccountView, ServiceError> {
        let holders = self.store.holders_of(username, email)?;
        gatekeep_auth::register_check(username, email, &holders)?;

        let credential_hash = self.credentials.hash(password)?;
        let account = gatekeep_auth::register(
            NewAccount {
                id: AccountId::new(),
                username: username.to_string(),
                email: email.to_string(),
                credential_hash,
                avatar: self.settings.default_avatar.clone(),
            },
            now,
        );

        let stored = self.store.insert(account)?;
        info!(account_id = %stored.id, username = %stored.username, "account registered");
        Ok(AccountView::from(&stored))
    }

    #[instrument(skip(self, password, now), err)]
    pub fn login(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, ServiceError> {
        self.sign_in(identifier, password, now, gatekeep_auth::login)
    }

    /// Login restricted to ADMIN and SUPER_ADMIN accounts.
    #[instrument(skip(self, password, now), err)]
    pub fn admin_login(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, ServiceError> {
        self.sign_in(identifier, password, now, gatekeep_auth::admin_login)
    }

    fn sign_in(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
        decide: fn(&Account, bool, DateTime<Utc>) -> Result<Account, Denial>,
    ) -> Result<LoginOutcome, ServiceError> {
        let mut current = self
            .store
            .find_by_identifier(identifier)?
            .ok_or(Denial::InvalidCredentials)?;

        let mut attempt = 1;
        let saved = loop {
            // Checked per attempt: a concurrent password change bumps the version too.
            let verified = self.credentials.verify(&current.credential_hash, password)?;
            let next = decide(&current, verified, now)?;
            match self.store.save(next, ExpectedVersion::of(&current)) {
                Ok(saved) => break saved,
                Err(StoreError::Conflict(reason)) if attempt < self.settings.max_write_attempts => {
                    debug!(
                        account_id = %current.id,
                        attempt,
                        %reason,
                        "login write conflict; retrying"
                    );
                    attempt += 1;
                    current = match self.store.get(current.id) {
                        Err(StoreError::NotFound) => return Err(Denial::InvalidCredentials.into()),
                        other => other?,
                    };
                }
                Err(e) => return Err(e.into()),
            }
        };

        let token = self.sessions.issue(&saved, now)?;
        info!(account_id = %saved.id, role = %saved.role, "login succeeded");
        Ok(LoginOutcome {
            token,
            token_type: "Bearer",
            expires_in: self.settings.session_ttl.num_seconds(),
            account: AccountView::from(&saved),
        })
    }

    /// Verify a bearer token; returns the claims it carries.
    pub fn authenticate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, ServiceError> {
        let claims = self.sessions.verify(token, now)?;
        Requester::from_claims(&claims)?;
        Ok(claims)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Role & status
    // ─────────────────────────────────────────────────────────────────────────

    #[instrument(skip(self), err)]
    pub fn change_role(
        &self,
        requester_id: AccountId,
        target_id: AccountId,
        new_role: Role,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("change_role", requester_id, target_id, |requester, target| {
            Ok(gatekeep_auth::role_change(requester, target, new_role)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    #[instrument(skip(self), err)]
    pub fn change_status(
        &self,
        requester_id: AccountId,
        target_id: AccountId,
        new_status: AccountStatus,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("change_status", requester_id, target_id, |requester, target| {
            Ok(gatekeep_auth::status_change(requester, target, new_status)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    #[instrument(skip(self, now), err)]
    pub fn ban(
        &self,
        requester_id: AccountId,
        target_id: AccountId,
        reason: &str,
        duration: BanDuration,
        now: DateTime<Utc>,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("ban", requester_id, target_id, |requester, target| {
            Ok(gatekeep_auth::ban(requester, target, reason, duration, now)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Self-service & deletion
    // ─────────────────────────────────────────────────────────────────────────

    /// Freeze the requester's own account.
    #[instrument(skip(self, now), err)]
    pub fn freeze(
        &self,
        requester_id: AccountId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("freeze", requester_id, requester_id, |requester, target| {
            Ok(gatekeep_auth::freeze(requester, target, reason, now)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    #[instrument(skip(self, now), err)]
    pub fn delete(
        &self,
        requester_id: AccountId,
        target_id: AccountId,
        now: DateTime<Utc>,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("delete", requester_id, target_id, |requester, target| {
            Ok(gatekeep_auth::delete_account(requester, target, now)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    /// Edit the requester's own username, email or avatar.
    #[instrument(skip(self), err)]
    pub fn update_profile(
        &self,
        requester_id: AccountId,
        change: &ProfileChange,
    ) -> Result<AccountView, ServiceError> {
        let saved = self.transition("update_profile", requester_id, requester_id, |_, target| {
            let username = change.username.as_deref().unwrap_or(&target.username);
            let email = change.email.as_deref().unwrap_or(&target.email);
            let holders = self.store.holders_of(username, email)?;
            Ok(gatekeep_auth::profile_change(target, change, &holders)?)
        })?;
        Ok(AccountView::from(&saved))
    }

    /// Replace the requester's secret after checking the current one.
    #[instrument(skip(self, current_password, new_password), err)]
    pub fn change_password(
        &self,
        requester_id: AccountId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let new_hash = self.credentials.hash(new_password)?;
        self.transition("change_password", requester_id, requester_id, |_, target| {
            if !self.credentials.verify(&target.credential_hash, current_password)? {
                return Err(Denial::InvalidCredentials.into());
            }
            Ok(Account {
                credential_hash: new_hash.clone(),
                ..target.clone()
            })
        })?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_account(&self, id: AccountId) -> Result<AccountView, ServiceError> {
        let account = self.load_target(id)?;
        if account.is_released() {
            return Err(Denial::NotFound.into());
        }
        Ok(AccountView::from(&account))
    }

    /// The requester's own admin profile. Requires standing like any other
    /// self-service operation.
    pub fn admin_profile(&self, requester_id: AccountId) -> Result<AdminProfile, ServiceError> {
        let account = self.load_requester_account(requester_id, requester_id)?;
        Ok(gatekeep_auth::admin_profile(&account)?)
    }
}
