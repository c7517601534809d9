//! Tracing setup

use asana_core::{AsanaError, AsanaResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{LogFormat, TelemetryConfig};

/// Install the global subscriber
///
/// `RUST_LOG` overrides the configured filter. Calling this twice is a no-op:
/// the first subscriber stays installed.
pub fn init_tracing(config: &TelemetryConfig) -> AsanaResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| AsanaError::ConfigParse(format!("log filter {}: {}", config.filter, e)))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
