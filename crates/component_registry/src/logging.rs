//! Logging setup for the game host
//
// Call `logging::init(&config.log_filter)` once during bootstrap, before
// registering components. `RUST_LOG` overrides the configured filter.

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global `tracing` subscriber.
///
/// - `default_filter`: `EnvFilter` directives used when `RUST_LOG` is unset.
/// - Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(val) => EnvFilter::new(val),
        None => EnvFilter::new(default_filter),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()?;

    tracing::debug!("Logging initialized");
    Ok(())
}
