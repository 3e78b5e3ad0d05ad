use std::sync::Arc;

use thiserror::Error;

use gatekeep_auth::Account;
use gatekeep_core::{AccountId, ExpectedVersion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account not found")]
    NotFound,

    /// Stale version, duplicate identifier, or a second root admin.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable account records.
pub trait AccountStore: Send + Sync {
    fn get(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Live (not frozen, not deleted) account answering to `identifier` as
    /// username or email.
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, StoreError>;

    /// Every account answering to `username` or `email` through either of its
    /// identifiers, released ones included.
    fn holders_of(&self, username: &str, email: &str) -> Result<Vec<Account>, StoreError>;

    fn root_admin(&self) -> Result<Option<Account>, StoreError>;

    /// Insert a new record. The store assigns the first version.
    fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Conditionally replace a record.
    ///
    /// Fails with `Conflict` unless the stored version matches `expected`.
    /// Returns exactly what a subsequent `get` returns.
    fn save(&self, account: Account, expected: ExpectedVersion) -> Result<Account, StoreError>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        (**self).get(id)
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_identifier(identifier)
    }

    fn holders_of(&self, username: &str, email: &str) -> Result<Vec<Account>, StoreError> {
        (**self).holders_of(username, email)
    }

    fn root_admin(&self) -> Result<Option<Account>, StoreError> {
        (**self).root_admin()
    }

    fn insert(&self, account: Account) -> Result<Account, StoreError> {
        (**self).insert(account)
    }

    fn save(&self, account: Account, expected: ExpectedVersion) -> Result<Account, StoreError> {
        (**self).save(account, expected)
    }
}
