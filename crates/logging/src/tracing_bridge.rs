//! crates/logging/src/tracing_bridge.rs
//! Installs the process-wide `tracing` subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use super::config::VerbosityConfig;

/// Builds the event filter for `config`.
///
/// A valid `RUST_LOG` value wins over the configured level.
#[must_use]
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
}

/// Installs a stderr `fmt` subscriber filtered by [`env_filter`].
///
/// Returns an error when a global subscriber is already set.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(&VerbosityConfig::from_verbose_level(1))?;
/// tracing::info!(path = "/mnt/tank/share", "acl updated");
/// ```
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layer)
        .try_init()
}
