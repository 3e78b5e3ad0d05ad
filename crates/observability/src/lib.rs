//! Process-wide tracing setup shared by gatekeep binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize structured logging with the format chosen by `LOG_FORMAT`.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
