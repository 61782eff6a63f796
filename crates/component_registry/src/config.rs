//! Host configuration, read from TOML.
//!
//! ```toml
//! pool_prewarm = 16
//! inits_per_step = 1
//! duplicate_policy = "skip"
//! log_filter = "info,component_registry=debug"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read host config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse host config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid host config: {0}")]
    Invalid(String),
}

/// What [`GameHost::register`](crate::GameHost::register) does with a
/// component whose id is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Report the duplicate to the caller.
    #[default]
    Reject,
    /// Keep the first registration, log a warning and carry on.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Nodes allocated into the registry's pool up front.
    pub pool_prewarm: usize,
    /// Components initialized per call to `step_initialization`.
    pub inits_per_step: usize,
    pub duplicate_policy: DuplicatePolicy,
    /// Default `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            pool_prewarm: 0,
            inits_per_step: 1,
            duplicate_policy: DuplicatePolicy::Reject,
            log_filter: "info".to_string(),
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded host config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inits_per_step == 0 {
            return Err(ConfigError::Invalid(
                "inits_per_step must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
