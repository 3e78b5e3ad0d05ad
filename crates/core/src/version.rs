//! Record versions for optimistic concurrency.

use crate::error::{DomainError, DomainResult};

/// A record that carries a store revision.
///
/// The revision is owned by the store: it is bumped on every successful write
/// and is what conditional updates are checked against.
pub trait Versioned {
    /// Monotonically increasing revision of the stored record.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for a conditional write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (bootstrap writes, migrations).
    Any,
    /// Require the record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    /// Expect whatever version `record` was read at.
    pub fn of(record: &impl Versioned) -> Self {
        ExpectedVersion::Exact(record.version())
    }

    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
