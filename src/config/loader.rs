use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::RuntimeConfig;
use crate::effect::millis;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl RuntimeConfig {
    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `RuntimeConfig::default()`.
    /// - Otherwise parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(RuntimeConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: RuntimeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The animation duration is not negative
    /// - The timeout multiplier is finite and at least 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        millis(self.presentation.animation_ms).map_err(|e| ConfigError::ValidationError {
            message: format!("presentation.animation_ms: {}", e),
        })?;

        let multiplier = self.presentation.timeout_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "presentation.timeout_multiplier must be >= 1.0 (got {})",
                    multiplier
                ),
            });
        }

        Ok(())
    }
}
