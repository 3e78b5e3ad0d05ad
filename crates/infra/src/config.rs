//! Configuration loading and representation.
//!
//! Settings come from environment variables. `Settings::from_lookup` takes
//! any key lookup so tests don't have to touch the process environment.

use chrono::Duration;
use thiserror::Error;

use gatekeep_auth::{AccountStatus, Role};

pub const DEFAULT_AVATAR: &str = "/uploads/default/avatar.png";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 3;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("incomplete root admin configuration: {0} must be set together")]
    IncompleteRootAdmin(&'static str),
}

/// Credentials and initial state for the bootstrap root admin.
#[derive(Clone, PartialEq, Eq)]
pub struct RootAdminSettings {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl core::fmt::Debug for RootAdminSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RootAdminSettings")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Settings {
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub default_avatar: String,
    /// Read-decide-write attempts per operation before a store conflict is
    /// surfaced to the caller.
    pub max_write_attempts: u32,
    pub root_admin: Option<RootAdminSettings>,
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Settings")
            .field("session_ttl", &self.session_ttl)
            .field("default_avatar", &self.default_avatar)
            .field("max_write_attempts", &self.max_write_attempts)
            .field("root_admin", &self.root_admin)
            .finish_non_exhaustive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            default_avatar: DEFAULT_AVATAR.to_string(),
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            root_admin: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let session_ttl = match get("SESSION_TTL_HOURS") {
            Some(raw) => {
                let hours: i64 = raw
                    .parse()
                    .map_err(|_| invalid("SESSION_TTL_HOURS", "not an integer"))?;
                if hours <= 0 {
                    return Err(invalid("SESSION_TTL_HOURS", "must be positive"));
                }
                Duration::try_hours(hours)
                    .ok_or_else(|| invalid("SESSION_TTL_HOURS", "out of range"))?
            }
            None => Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        };

        let max_write_attempts = match get("MAX_WRITE_ATTEMPTS") {
            Some(raw) => {
                let attempts: u32 = raw
                    .parse()
                    .map_err(|_| invalid("MAX_WRITE_ATTEMPTS", "not an integer"))?;
                if attempts == 0 {
                    return Err(invalid("MAX_WRITE_ATTEMPTS", "must be at least 1"));
                }
                attempts
            }
            None => DEFAULT_MAX_WRITE_ATTEMPTS,
        };

        let default_avatar = get("DEFAULT_AVATAR").unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        let root_admin = match (get("ADMIN_USERNAME"), get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (None, None, None) => None,
            (Some(username), Some(email), Some(password)) => {
                let role = match get("ADMIN_ROLE") {
                    Some(raw) => raw
                        .parse::<Role>()
                        .map_err(|e| invalid("ADMIN_ROLE", e.to_string()))?,
                    None => Role::SuperAdmin,
                };
                let status = match get("ADMIN_STATUS") {
                    Some(raw) => raw
                        .parse::<AccountStatus>()
                        .map_err(|e| invalid("ADMIN_STATUS", e.to_string()))?,
                    None => AccountStatus::Active,
                };
                if !status.is_toggleable() {
                    return Err(invalid("ADMIN_STATUS", "must be active or passive"));
                }
                Some(RootAdminSettings {
                    username,
                    email,
                    password,
                    role,
                    status,
                })
            }
            _ => {
                return Err(ConfigError::IncompleteRootAdmin(
                    "ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD",
                ));
            }
        };

        Ok(Self {
            jwt_secret,
            session_ttl,
            default_avatar,
            max_write_attempts,
            root_admin,
        })
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}
