//! Diagnostic logging setup.
//!
//! Logs always go to stderr; stdout is reserved for the JSON-RPC transport
//! and for command output.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// An explicit `override_level` wins. Otherwise `RUST_LOG` is used when set,
/// falling back to `configured_level`. Calling this more than once is a no-op.
pub fn init(configured_level: &str, override_level: Option<&str>) {
    let filter = match override_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured_level)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
