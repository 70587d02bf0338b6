//! Guard configuration
//! Limits and message language applied when checking untrusted payloads

use std::env;
use thiserror::Error;
use tracing::info;

use crate::messages::Locale;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Default maximum nesting depth accepted for JSON payloads
pub const DEFAULT_MAX_JSON_DEPTH: usize = 32;
/// Default maximum payload size (1 MB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct GuardConfig {
    pub locale: Locale,
    pub max_json_depth: usize,
    pub max_input_bytes: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            max_json_depth: DEFAULT_MAX_JSON_DEPTH,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl GuardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let locale = match lookup("GUARD_LOCALE") {
            Some(raw) => raw.parse::<Locale>().map_err(|_| ConfigError::InvalidLocale(raw))?,
            None => Locale::default(),
        };

        let max_json_depth = lookup("GUARD_MAX_JSON_DEPTH")
            .unwrap_or_else(|| DEFAULT_MAX_JSON_DEPTH.to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidConfig(format!("Invalid max JSON depth: {}", e)))?;

        // Validate depth is reasonable (1 to 512 levels)
        if !(1..=512).contains(&max_json_depth) {
            return Err(ConfigError::InvalidConfig(
                "Max JSON depth must be between 1 and 512".to_string(),
            ));
        }

        let max_input_bytes = lookup("GUARD_MAX_INPUT_BYTES")
            .unwrap_or_else(|| DEFAULT_MAX_INPUT_BYTES.to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidConfig(format!("Invalid max input bytes: {}", e)))?;

        if max_input_bytes == 0 {
            return Err(ConfigError::InvalidConfig(
                "Max input bytes must be greater than zero".to_string(),
            ));
        }

        info!(
            "Guard configuration loaded: locale={}, max_json_depth={}, max_input_bytes={}",
            locale, max_json_depth, max_input_bytes
        );

        Ok(GuardConfig {
            locale,
            max_json_depth,
            max_input_bytes,
        })
    }
}
