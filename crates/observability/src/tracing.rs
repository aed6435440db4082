//! Subscriber installation.
//!
//! Events are written as JSON lines, one per event. Event fields sit at the
//! top level of each line; the current span (sort mode, page, product id) is
//! attached as a nested `span` object. `RUST_LOG` overrides the default
//! directive.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "info";

pub fn init() {
    init_with(DEFAULT_DIRECTIVE);
}

/// Like [`init`], with `directive` used when `RUST_LOG` is unset or invalid.
pub fn init_with(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // A subscriber may already be installed (another test, the host binary).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
