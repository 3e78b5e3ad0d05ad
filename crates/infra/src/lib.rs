//! Infrastructure layer: account storage, configuration, bootstrap seeding
//! and the account service that ties them to the engine.

pub mod account_store;
pub mod bootstrap;
pub mod config;
pub mod service;

pub use account_store::{AccountStore, InMemoryAccountStore, StoreError};
pub use bootstrap::{seed_root_admin, SeedError, SeedOutcome};
pub use config::{ConfigError, RootAdminSettings, Settings};
pub use service::{AccountService, LoginOutcome, ServiceError};
