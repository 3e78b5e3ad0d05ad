//! Account record (persistence shape).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatekeep_core::{AccountId, Versioned};

use crate::{AccountStatus, Role};

/// Normalize a username or email for storage and comparison.
///
/// Identifiers are compared case-insensitively everywhere (registration,
/// profile changes, store lookups, login). Usernames and emails share one
/// namespace, because login accepts either.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// A stored account.
///
/// This is the record shape the store persists and hands back. Values leaving
/// the system go through `crate::projection` instead (the credential hash and
/// root flag never leave).
///
/// # Invariants
/// - `status == Banned` implies a non-empty `ban_reason`.
/// - `status == Frozen` implies a non-empty `frozen_reason` and `deleted_at`.
/// - `status == Deleted` implies `deleted_at`.
/// - `is_root_admin` is only ever set by the bootstrap seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub credential_hash: String,
    pub avatar: String,
    pub role: Role,
    pub is_root_admin: bool,
    pub status: AccountStatus,
    pub ban_reason: Option<String>,
    pub ban_end_date: Option<DateTime<Utc>>,
    pub frozen_reason: Option<String>,
    pub frozen_date: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    pub version: u64,
}

impl Account {
    /// Frozen or deleted accounts no longer hold their username/email.
    pub fn is_released(&self) -> bool {
        self.deleted_at.is_some()
            || matches!(self.status, AccountStatus::Frozen | AccountStatus::Deleted)
    }

    pub fn holds_username(&self, username: &str) -> bool {
        self.username == normalize_identifier(username)
    }

    pub fn holds_email(&self, email: &str) -> bool {
        self.email == normalize_identifier(email)
    }

    /// Matches either identifier, as login does.
    pub fn answers_to(&self, identifier: &str) -> bool {
        self.holds_username(identifier) || self.holds_email(identifier)
    }

    /// Whether `other` could be confused with this account at login.
    pub fn shares_identifier_with(&self, other: &Account) -> bool {
        self.answers_to(&other.username) || self.answers_to(&other.email)
    }

    /// A time-bounded ban whose end date has passed.
    pub fn ban_has_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == AccountStatus::Banned && self.ban_end_date.is_some_and(|end| end <= now)
    }

    pub(crate) fn clear_ban(&mut self) {
        self.ban_reason = None;
        self.ban_end_date = None;
    }
}

impl Versioned for Account {
    fn version(&self) -> u64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::fixtures::*;
    use super::*;

    #[test]
    fn identifiers_compare_case_insensitively() {
        let account = account("Alice", Role::User);
        assert_eq!(account.username, "alice");
        assert!(account.holds_username("ALICE"));
        assert!(account.holds_email(" Alice@Example.com "));
        assert!(account.answers_to("alice@example.com"));
        assert!(!account.answers_to("bob"));
    }

    #[test]
    fn usernames_and_emails_share_one_namespace() {
        let bob = account("bob", Role::User);
        let squatter = Account {
            username: "bob@example.com".to_string(),
            email: "other@example.com".to_string(),
            ..account("squatter", Role::User)
        };
        assert!(bob.shares_identifier_with(&squatter));
        assert!(squatter.shares_identifier_with(&bob));
        assert!(!bob.shares_identifier_with(&account("carol", Role::User)));
    }

    #[test]
    fn frozen_and_deleted_accounts_release_identifiers() {
        let mut account = account("carol", Role::User);
        assert!(!account.is_released());

        account.status = AccountStatus::Banned;
        assert!(!account.is_released());

        account.status = AccountStatus::Frozen;
        account.deleted_at = Some(t0());
        assert!(account.is_released());

        account.status = AccountStatus::Deleted;
        assert!(account.is_released());
    }

    #[test]
    fn only_time_bounded_bans_expire() {
        let mut account = account("dave", Role::User);
        account.status = AccountStatus::Banned;
        account.ban_reason = Some("spam".to_string());

        assert!(!account.ban_has_expired(t0() + Duration::days(3650)));

        account.ban_end_date = Some(t0() + Duration::days(1));
        assert!(!account.ban_has_expired(t0()));
        assert!(account.ban_has_expired(t0() + Duration::days(1)));
    }

    #[test]
    fn persistence_shape_round_trips_through_json() {
        let mut account = account("erin", Role::Editor);
        account.status = AccountStatus::Banned;
        account.ban_reason = Some("spam".to_string());
        account.ban_end_date = Some(t0() + Duration::weeks(1));

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["role"], "EDITOR");
        assert_eq!(json["status"], "banned");

        let back: Account = serde_json::from_value(json).unwrap();
        assert_eq!(back, account);
    }
}
