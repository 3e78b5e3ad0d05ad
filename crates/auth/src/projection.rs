//! Output shapes. Each one is an explicit projection of [`Account`]; the
//! credential hash and root flag are never part of any of them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gatekeep_core::AccountId;

use crate::{Account, AccountStatus, Denial, Role};

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub status: AccountStatus,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_date: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            avatar: account.avatar.clone(),
            status: account.status,
            role: account.role,
            created_at: account.created_at,
            ban_reason: account.ban_reason.clone(),
            ban_end_date: account.ban_end_date,
            frozen_reason: account.frozen_reason.clone(),
            frozen_date: account.frozen_date,
        }
    }
}

/// Profile shown to an administrator about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminProfile {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub status: AccountStatus,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// Admin profile for `account`; non-admins are `Forbidden`.
pub fn admin_profile(account: &Account) -> Result<AdminProfile, Denial> {
    if !account.role.is_privileged() {
        return Err(Denial::Forbidden("admin privileges required"));
    }
    Ok(AdminProfile {
        id: account.id,
        username: account.username.clone(),
        email: account.email.clone(),
        avatar: account.avatar.clone(),
        status: account.status,
        role: account.role,
        created_at: account.created_at,
        last_login_at: account.last_login_at,
    })
}
