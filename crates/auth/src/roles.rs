use core::str::FromStr;

use serde::{Deserialize, Serialize};

use gatekeep_core::DomainError;

/// Account role.
///
/// The declaration order (`User < Editor < Admin < SuperAdmin`) is only used
/// for coarse "is privileged" checks. It is not a dominance order: an admin
/// does not automatically outrank every lower role for every operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Editor,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Editor, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// ADMIN or SUPER_ADMIN.
    pub fn is_privileged(&self) -> bool {
        *self >= Role::Admin
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "EDITOR" => Ok(Role::Editor),
            "ADMIN" => Ok(Role::Admin),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_matches_serde_form() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn only_admins_are_privileged() {
        assert!(!Role::User.is_privileged());
        assert!(!Role::Editor.is_privileged());
        assert!(Role::Admin.is_privileged());
        assert!(Role::SuperAdmin.is_privileged());
    }

    #[test]
    fn lowercase_role_is_rejected() {
        assert!("admin".parse::<Role>().is_err());
    }
}
