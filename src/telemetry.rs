//! Tracing subscriber setup.

use crate::config::TrackerConfig;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for a malformed filter and
/// [`TelemetryError::Install`] when a subscriber is already set.
pub fn init_tracing(config: &TrackerConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_filter)?;
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    tracing::debug!(json = config.log_json, "tracing initialised");
    Ok(())
}
