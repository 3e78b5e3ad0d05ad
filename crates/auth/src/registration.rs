//! Registration, root bootstrap and profile changes: the rules guarding
//! username/email ownership.

use chrono::{DateTime, Utc};

use gatekeep_core::AccountId;

use crate::account::normalize_identifier;
use crate::{Account, AccountStatus, Denial, Role};

/// Input for a new account. Secrets arrive already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub credential_hash: String,
    pub avatar: String,
}

/// Requested profile edits; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChange {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

fn non_blank(value: &str, what: &str) -> Result<String, Denial> {
    let normalized = normalize_identifier(value);
    if normalized.is_empty() {
        return Err(Denial::invalid_input(format!("{what} is required")));
    }
    Ok(normalized)
}

/// Decide whether `username`/`email` may be registered.
///
/// `holders` are the stored accounts whose username or email matches either
/// candidate, frozen and deleted ones included. A candidate clashes with
/// either identifier of a holder: login resolves both. Frozen and deleted holders no
/// longer own their identifiers. A banned holder keeps them, and is reported
/// as `UserBanned` rather than "taken".
pub fn register_check(username: &str, email: &str, holders: &[Account]) -> Result<(), Denial> {
    let username = non_blank(username, "username")?;
    let email = non_blank(email, "email")?;

    let live: Vec<&Account> = holders
        .iter()
        .filter(|a| !a.is_released())
        .filter(|a| a.answers_to(&username) || a.answers_to(&email))
        .collect();

    if live.iter().any(|a| a.status == AccountStatus::Banned) {
        return Err(Denial::UserBanned);
    }
    if live.iter().any(|a| a.answers_to(&username)) {
        return Err(Denial::UsernameTaken);
    }
    if live.iter().any(|a| a.answers_to(&email)) {
        return Err(Denial::EmailTaken);
    }
    Ok(())
}

/// Build a freshly registered account (USER, active).
pub fn register(new: NewAccount, now: DateTime<Utc>) -> Account {
    Account {
        id: new.id,
        username: normalize_identifier(&new.username),
        email: normalize_identifier(&new.email),
        credential_hash: new.credential_hash,
        avatar: new.avatar,
        role: Role::User,
        is_root_admin: false,
        status: AccountStatus::Active,
        ban_reason: None,
        ban_end_date: None,
        frozen_reason: None,
        frozen_date: None,
        deleted_at: None,
        created_at: now,
        last_login_at: now,
        version: 0,
    }
}

/// Build the bootstrap root admin. The only place `is_root_admin` is set.
pub fn root_account(
    new: NewAccount,
    role: Role,
    status: AccountStatus,
    now: DateTime<Utc>,
) -> Account {
    Account {
        role,
        status,
        is_root_admin: true,
        ..register(new, now)
    }
}

/// Apply profile edits to `target`.
///
/// A new username or email must not be held, as either identifier, by another
/// live account.
pub fn profile_change(
    target: &Account,
    change: &ProfileChange,
    holders: &[Account],
) -> Result<Account, Denial> {
    if target.is_released() {
        return Err(Denial::NotFound);
    }

    let held_by_other = |pred: &dyn Fn(&Account) -> bool| {
        holders
            .iter()
            .any(|a| a.id != target.id && !a.is_released() && pred(a))
    };

    let mut next = target.clone();

    if let Some(username) = &change.username {
        let username = non_blank(username, "username")?;
        if username != target.username {
            if held_by_other(&|a| a.answers_to(&username)) {
                return Err(Denial::UsernameTaken);
            }
            next.username = username;
        }
    }

    if let Some(email) = &change.email {
        let email = non_blank(email, "email")?;
        if email != target.email {
            if held_by_other(&|a| a.answers_to(&email)) {
                return Err(Denial::EmailTaken);
            }
            next.email = email;
        }
    }

    if let Some(avatar) = change.avatar.as_deref().map(str::trim) {
        if !avatar.is_empty() {
            next.avatar = avatar.to_string();
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::fixtures::{account, t0};
    use crate::{freeze, Requester};

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            id: AccountId::new(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            credential_hash: "$argon2id$fake".to_string(),
            avatar: "/uploads/default/avatar.png".to_string(),
        }
    }

    #[test]
    fn registration_defaults() {
        let account = register(new_account("Alice"), t0());
        assert_eq!(account.username, "alice");
        assert_eq!(account.role, Role::User);
        assert_eq!(account.status, AccountStatus::Active);
        assert!(!account.is_root_admin);
        assert_eq!(account.created_at, t0());
        assert_eq!(account.version, 0);
    }

    #[test]
    fn root_account_is_flagged() {
        let root = root_account(new_account("root"), Role::SuperAdmin, AccountStatus::Active, t0());
        assert!(root.is_root_admin);
        assert_eq!(root.role, Role::SuperAdmin);
    }

    #[test]
    fn taken_username_then_reuse_after_freeze() {
        assert_eq!(register_check("alice", "alice@example.com", &[]), Ok(()));

        let alice = register(new_account("alice"), t0());
        let holders = vec![alice.clone()];
        assert_eq!(
            register_check("ALICE", "someone@example.com", &holders),
            Err(Denial::UsernameTaken)
        );

        let frozen = freeze(&Requester::of(&alice), &alice, "break", t0()).unwrap();
        assert_eq!(register_check("alice", "alice@example.com", &[frozen]), Ok(()));
    }

    #[test]
    fn taken_email() {
        let holders = vec![account("bob", Role::User)];
        assert_eq!(
            register_check("robert", "Bob@Example.com", &holders),
            Err(Denial::EmailTaken)
        );
    }

    #[test]
    fn username_may_not_shadow_another_accounts_email() {
        let holders = vec![account("bob", Role::User)];
        assert_eq!(
            register_check("Bob@example.com", "squatter@example.com", &holders),
            Err(Denial::UsernameTaken)
        );
        assert_eq!(
            register_check("squatter", "bob", &holders),
            Err(Denial::EmailTaken)
        );
    }

    #[test]
    fn banned_identities_are_not_recyclable() {
        let mut banned = account("mallory", Role::User);
        banned.status = AccountStatus::Banned;
        banned.ban_reason = Some("spam".to_string());
        assert_eq!(
            register_check("mallory", "new@example.com", &[banned]),
            Err(Denial::UserBanned)
        );
    }

    #[test]
    fn blank_identifiers_are_invalid() {
        let err = register_check("  ", "x@example.com", &[]).unwrap_err();
        assert!(matches!(err, Denial::InvalidInput(_)));
    }

    #[test]
    fn profile_change_updates_fields() {
        let me = account("me", Role::User);
        let change = ProfileChange {
            username: Some("Me2".to_string()),
            email: None,
            avatar: Some("/uploads/me.png".to_string()),
        };
        let next = profile_change(&me, &change, &[me.clone()]).unwrap();
        assert_eq!(next.username, "me2");
        assert_eq!(next.email, me.email);
        assert_eq!(next.avatar, "/uploads/me.png");
    }

    #[test]
    fn profile_change_rejects_identifier_held_by_another() {
        let me = account("me", Role::User);
        let other = account("other", Role::User);
        let change = ProfileChange {
            email: Some(other.email.clone()),
            ..Default::default()
        };
        assert_eq!(profile_change(&me, &change, &[other]), Err(Denial::EmailTaken));
    }

    #[test]
    fn profile_change_cannot_take_another_accounts_email_as_username() {
        let me = account("me", Role::User);
        let other = account("other", Role::User);
        let change = ProfileChange {
            username: Some(other.email.clone()),
            ..Default::default()
        };
        assert_eq!(profile_change(&me, &change, &[other]), Err(Denial::UsernameTaken));
    }

    #[test]
    fn profile_change_to_own_identifier_is_a_no_op() {
        let me = account("me", Role::User);
        let change = ProfileChange {
            username: Some("ME".to_string()),
            ..Default::default()
        };
        assert_eq!(profile_change(&me, &change, &[me.clone()]), Ok(me));
    }
}
