//! Login decisions.

use chrono::{DateTime, Utc};

use crate::{Account, AccountStatus, Denial};

/// Decide a login for `target` once its secret has been checked.
///
/// An expired time-bounded ban is lifted on the way in. On success the
/// returned state carries the new `last_login_at`.
pub fn login(
    target: &Account,
    secret_verified: bool,
    now: DateTime<Utc>,
) -> Result<Account, Denial> {
    if target.is_released() || !secret_verified {
        return Err(Denial::InvalidCredentials);
    }
    admit(target, now)
}

/// Like [`login`], but only for ADMIN and SUPER_ADMIN accounts.
pub fn admin_login(
    target: &Account,
    secret_verified: bool,
    now: DateTime<Utc>,
) -> Result<Account, Denial> {
    if target.is_released() || !secret_verified {
        return Err(Denial::InvalidCredentials);
    }
    if !target.role.is_privileged() {
        return Err(Denial::Unauthorized);
    }
    admit(target, now)
}

fn admit(target: &Account, now: DateTime<Utc>) -> Result<Account, Denial> {
    let mut next = target.clone();
    if next.ban_has_expired(now) {
        next.clear_ban();
        next.status = AccountStatus::Active;
    }
    if next.status != AccountStatus::Active {
        return Err(Denial::UserNotActive);
    }
    next.last_login_at = now;
    Ok(next)
}
