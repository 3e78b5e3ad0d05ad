use serde::Serialize;
use thiserror::Error;

/// Why the engine refused an operation.
///
/// Denials are plain values: the engine never panics or retries, and every
/// variant is specific enough for a transport layer to pick a status code
/// without re-deriving the rule that fired.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denial {
    #[error("account not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("the root admin's role is fixed")]
    RootImmutable,

    #[error("only the root admin can change a SUPER_ADMIN's role")]
    SuperAdminRoleGuarded,

    #[error("only the root admin can grant the SUPER_ADMIN role")]
    SuperAdminGrantGuarded,

    #[error("admins can only modify USER and EDITOR accounts")]
    AdminScopeExceeded,

    #[error("username is already taken")]
    UsernameTaken,

    #[error("email is already taken")]
    EmailTaken,

    #[error("this account is banned")]
    UserBanned,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user is not active")]
    UserNotActive,
}

/// Coarse classification of a [`Denial`], for mapping onto transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    NotFound,
    Unauthorized,
    Forbidden,
    InvalidInput,
    Conflict,
    Credentials,
}

impl Denial {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn category(&self) -> DenialCategory {
        match self {
            Denial::NotFound => DenialCategory::NotFound,
            Denial::Unauthorized => DenialCategory::Unauthorized,
            Denial::Forbidden(_)
            | Denial::RootImmutable
            | Denial::SuperAdminRoleGuarded
            | Denial::SuperAdminGrantGuarded
            | Denial::AdminScopeExceeded
            | Denial::UserBanned
            | Denial::UserNotActive => DenialCategory::Forbidden,
            Denial::InvalidInput(_) => DenialCategory::InvalidInput,
            Denial::UsernameTaken | Denial::EmailTaken => DenialCategory::Conflict,
            Denial::InvalidCredentials => DenialCategory::Credentials,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Denial::NotFound => "not_found",
            Denial::Unauthorized => "unauthorized",
            Denial::Forbidden(_) => "forbidden",
            Denial::InvalidInput(_) => "invalid_input",
            Denial::RootImmutable => "root_immutable",
            Denial::SuperAdminRoleGuarded => "super_admin_role_guarded",
            Denial::SuperAdminGrantGuarded => "super_admin_grant_guarded",
            Denial::AdminScopeExceeded => "admin_scope_exceeded",
            Denial::UsernameTaken => "username_taken",
            Denial::EmailTaken => "email_taken",
            Denial::UserBanned => "user_banned",
            Denial::InvalidCredentials => "invalid_credentials",
            Denial::UserNotActive => "user_not_active",
        }
    }
}
