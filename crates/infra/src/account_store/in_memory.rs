use std::collections::HashMap;
use std::sync::RwLock;

use gatekeep_auth::Account;
use gatekeep_core::{AccountId, ExpectedVersion};
use tracing::debug;

use super::r#trait::{AccountStore, StoreError};

/// In-memory account store.
///
/// Intended for tests/dev. Lookups scan every record.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

/// Live identifiers are unique across live accounts, usernames and emails
/// alike.
fn ensure_identifiers_free<'a>(
    candidate: &Account,
    mut others: impl Iterator<Item = &'a Account>,
) -> Result<(), StoreError> {
    if candidate.is_released() {
        return Ok(());
    }
    let clash = others
        .find(|a| a.id != candidate.id && !a.is_released() && a.shares_identifier_with(candidate));
    match clash {
        Some(existing) => Err(StoreError::Conflict(format!(
            "identifier already held by account {}",
            existing.id
        ))),
        None => Ok(()),
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        map.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .find(|a| !a.is_released() && a.answers_to(identifier))
            .cloned())
    }

    fn holders_of(&self, username: &str, email: &str) -> Result<Vec<Account>, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .filter(|a| a.answers_to(username) || a.answers_to(email))
            .cloned()
            .collect())
    }

    fn root_admin(&self) -> Result<Option<Account>, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|a| a.is_root_admin).cloned())
    }

    fn insert(&self, mut account: Account) -> Result<Account, StoreError> {
        let mut map = self.accounts.write().map_err(|_| poisoned())?;

        if map.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!("account {} already exists", account.id)));
        }
        if account.is_root_admin && map.values().any(|a| a.is_root_admin) {
            return Err(StoreError::Conflict("a root admin already exists".to_string()));
        }
        ensure_identifiers_free(&account, map.values())?;

        account.version = 1;
        debug!(account_id = %account.id, "account inserted");
        map.insert(account.id, account.clone());
        Ok(account)
    }

    fn save(&self, mut account: Account, expected: ExpectedVersion) -> Result<Account, StoreError> {
        let mut map = self.accounts.write().map_err(|_| poisoned())?;

        let current = map.get(&account.id).ok_or(StoreError::NotFound)?;
        expected
            .check(current.version)
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        if current.is_root_admin != account.is_root_admin {
            return Err(StoreError::Conflict("the root admin flag is immutable".to_string()));
        }
        ensure_identifiers_free(&account, map.values())?;

        account.version = current.version + 1;
        debug!(account_id = %account.id, version = account.version, "account saved");
        map.insert(account.id, account.clone());
        Ok(account)
    }
}
