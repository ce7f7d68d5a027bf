//! Tracing/logging initialization.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Initialize tracing from configuration.
///
/// The `RUST_LOG` environment variable takes precedence over the
/// configured level. Safe to call more than once; later calls are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        _ => fmt().pretty().with_env_filter(filter).with_target(true).try_init(),
    };

    // Already-initialized is fine (tests initialize repeatedly).
    let _ = result;
}
