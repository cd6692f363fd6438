//! Logging setup utilities for the Aizu binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for an Aizu binary.
///
/// Builds a default `EnvFilter` that enables `default_log_level` for this
/// crate and for the calling binary's target (dashes in `binary_name` are
/// normalized to underscores, so `"aizu-server"` filters the `aizu_server`
/// target). `RUST_LOG` overrides the default filter entirely.
///
/// Both binaries call this at startup: `aizu-server` with `"debug"`,
/// `aizu-client` with `"info"`.
///
/// # Examples
///
/// ```no_run
/// use aizu_shared::logger::setup_logger;
///
/// setup_logger("aizu-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={},{}={}",
                    env!("CARGO_PKG_NAME").replace("-", "_"),
                    default_log_level,
                    binary_name.replace("-", "_"),
                    default_log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
