//! Tracing-based structured logging initialization.
//!
//! Installs a global `tracing` subscriber with a fmt layer. Verbosity is
//! controlled through `RUST_LOG` (via [`EnvFilter`]), defaulting to `info`
//! for this crate when unset.
//!
//! Store failures are logged at `error` with their full internal context,
//! which never reaches a client response. Notification failures are logged
//! at `warn` because they are advisory by design.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,intake_server=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
