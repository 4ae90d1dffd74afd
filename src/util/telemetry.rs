//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the `RUST_LOG` filter. Callers may install their own
/// subscriber first; in that case this is a no-op.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Initialize tracing, falling back to `default_directive` when `RUST_LOG` is
/// unset or invalid.
pub fn init_tracing_with(default_directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
