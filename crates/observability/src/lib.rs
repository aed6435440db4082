//! Process-wide logging setup shared by storefront binaries and tests.

pub mod tracing;

pub use crate::tracing::{DEFAULT_DIRECTIVE, init_with};

/// Install the JSON subscriber with the default `info` filter.
///
/// Repeated calls are no-ops.
pub fn init() {
    crate::tracing::init();
}
