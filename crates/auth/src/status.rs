use core::str::FromStr;

use serde::{Deserialize, Serialize};

use gatekeep_core::DomainError;

/// Account status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Can authenticate.
    #[default]
    Active,
    /// Paused by its owner; cannot authenticate.
    Passive,
    /// Suspended by an administrator, permanently or until `ban_end_date`.
    Banned,
    /// Paused by its owner through a soft delete. Releases username/email.
    Frozen,
    /// Soft deleted. Releases username/email.
    Deleted,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 5] = [
        AccountStatus::Active,
        AccountStatus::Passive,
        AccountStatus::Banned,
        AccountStatus::Frozen,
        AccountStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Passive => "passive",
            AccountStatus::Banned => "banned",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Deleted => "deleted",
        }
    }

    /// Statuses reachable through an ordinary status change.
    pub fn is_toggleable(&self) -> bool {
        matches!(self, AccountStatus::Active | AccountStatus::Passive)
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown status '{s}'")))
    }
}
