//! Account authorization rules: who may change whose role or status.
//!
//! Every function here is a pure decision:
//! - No IO, no clock reads (time is passed in)
//! - No panics
//! - Input is the requester and a freshly loaded target; output is either
//!   the target's next state or a [`Denial`]
//!
//! Persisting the returned state (and serializing read-decide-write per
//! account) is the caller's job.

use chrono::{DateTime, Utc};

use crate::clock::{expiry, BanDuration};
use crate::{Account, AccountStatus, Denial, Requester, Role};

/// Frozen and deleted accounts are invisible to every mutation.
fn ensure_present(target: &Account) -> Result<(), Denial> {
    if target.is_released() {
        return Err(Denial::NotFound);
    }
    Ok(())
}

fn ensure_not_super_admin(target: &Account, what: &'static str) -> Result<(), Denial> {
    if target.role == Role::SuperAdmin {
        return Err(Denial::Forbidden(what));
    }
    Ok(())
}

fn reason_text(reason: &str, what: &str) -> Result<String, Denial> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(Denial::invalid_input(format!("{what} reason is required")));
    }
    Ok(reason.to_string())
}

/// Change `target`'s role.
///
/// The root admin's role is fixed for life; only the root admin can touch a
/// SUPER_ADMIN or mint a new one; admins are confined to USER and EDITOR
/// accounts; ordinary users cannot manage roles at all.
pub fn role_change(
    requester: &Requester,
    target: &Account,
    new_role: Role,
) -> Result<Account, Denial> {
    ensure_present(target)?;

    if target.is_root_admin {
        return Err(Denial::RootImmutable);
    }
    if target.role == Role::SuperAdmin && !requester.is_root_admin {
        return Err(Denial::SuperAdminRoleGuarded);
    }
    if new_role == Role::SuperAdmin && !requester.is_root_admin {
        return Err(Denial::SuperAdminGrantGuarded);
    }
    if requester.role == Role::Admin && !matches!(target.role, Role::User | Role::Editor) {
        return Err(Denial::AdminScopeExceeded);
    }
    if !requester.is_root_admin && !requester.role.is_privileged() {
        return Err(Denial::Unauthorized);
    }

    Ok(Account {
        role: new_role,
        ..target.clone()
    })
}

/// Toggle `target` between `active` and `passive`.
///
/// USER and EDITOR requesters may only act on themselves and cannot lift a
/// ban they are under. Admins cannot touch peer admins. Bans, freezes and
/// deletions have dedicated operations; asking for those statuses here is
/// `InvalidInput`. Leaving `banned` clears the ban details.
pub fn status_change(
    requester: &Requester,
    target: &Account,
    new_status: AccountStatus,
) -> Result<Account, Denial> {
    ensure_present(target)?;
    ensure_not_super_admin(target, "a SUPER_ADMIN's status is immutable")?;

    match requester.role {
        Role::User | Role::Editor => {
            if new_status == AccountStatus::Banned {
                return Err(Denial::Forbidden("users cannot ban accounts"));
            }
            if !requester.is_self(target) {
                return Err(Denial::Forbidden("users can only change their own status"));
            }
            if target.status == AccountStatus::Banned {
                return Err(Denial::Forbidden("users cannot lift their own ban"));
            }
        }
        Role::Admin => {
            if target.role == Role::Admin {
                return Err(Denial::Forbidden("admins cannot change a peer admin's status"));
            }
        }
        Role::SuperAdmin => {}
    }

    match new_status {
        AccountStatus::Banned => {
            return Err(Denial::invalid_input(
                "banning requires a reason and duration; use ban",
            ));
        }
        AccountStatus::Frozen | AccountStatus::Deleted => {
            return Err(Denial::invalid_input(format!(
                "status '{new_status}' is only reachable through freeze or delete"
            )));
        }
        AccountStatus::Active | AccountStatus::Passive => {}
    }

    let mut next = target.clone();
    if next.status == AccountStatus::Banned {
        next.clear_ban();
    }
    next.status = new_status;
    Ok(next)
}

/// Ban `target`, permanently or for `duration`.
pub fn ban(
    requester: &Requester,
    target: &Account,
    reason: &str,
    duration: BanDuration,
    now: DateTime<Utc>,
) -> Result<Account, Denial> {
    ensure_present(target)?;
    // Ahead of the standing check so a SUPER_ADMIN target is Forbidden for
    // every requester.
    ensure_not_super_admin(target, "SUPER_ADMIN accounts cannot be banned")?;

    if !requester.role.is_privileged() {
        return Err(Denial::Unauthorized);
    }
    if requester.role == Role::Admin && target.role.is_privileged() {
        return Err(Denial::Forbidden("admins cannot ban admins"));
    }

    let reason = reason_text(reason, "ban")?;
    let ban_end_date = expiry(now, duration)?;

    Ok(Account {
        status: AccountStatus::Banned,
        ban_reason: Some(reason),
        ban_end_date,
        ..target.clone()
    })
}

/// Freeze the requester's own account (a soft delete that releases its
/// username and email).
pub fn freeze(
    requester: &Requester,
    target: &Account,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Account, Denial> {
    ensure_present(target)?;
    ensure_not_super_admin(target, "SUPER_ADMIN accounts cannot be frozen")?;

    if !requester.is_self(target) {
        return Err(Denial::Forbidden("accounts can only be frozen by their owner"));
    }

    let reason = reason_text(reason, "freeze")?;

    let mut next = target.clone();
    next.clear_ban();
    next.status = AccountStatus::Frozen;
    next.frozen_reason = Some(reason);
    next.frozen_date = Some(now);
    next.deleted_at = Some(now);
    Ok(next)
}

/// Soft delete `target`. Owners may delete themselves; SUPER_ADMINs may
/// delete anyone except another SUPER_ADMIN.
pub fn delete_account(
    requester: &Requester,
    target: &Account,
    now: DateTime<Utc>,
) -> Result<Account, Denial> {
    ensure_present(target)?;
    ensure_not_super_admin(target, "SUPER_ADMIN accounts cannot be deleted")?;

    if !requester.is_self(target) && requester.role != Role::SuperAdmin {
        return Err(Denial::Unauthorized);
    }

    let mut next = target.clone();
    next.clear_ban();
    next.status = AccountStatus::Deleted;
    next.deleted_at = Some(now);
    Ok(next)
}
