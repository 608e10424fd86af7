//! Tracing/logging setup shared by the Stockia binaries.

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init();
}

pub use self::tracing::{LogFormat, init_with};

/// Tracing configuration (filters, output format).
pub mod tracing;
