//! `gatekeep-core` — shared building blocks for the account engine.
//!
//! This crate contains **pure** primitives (no storage, no transport).

pub mod error;
pub mod id;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::AccountId;
pub use version::{ExpectedVersion, Versioned};
