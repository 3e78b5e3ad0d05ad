//! Account persistence boundary.
//!
//! Single-record reads and conditional single-record writes. No cross-record
//! transactions are offered or needed: read-decide-write on one account is
//! made atomic by `save`'s version check.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryAccountStore;
pub use r#trait::{AccountStore, StoreError};
