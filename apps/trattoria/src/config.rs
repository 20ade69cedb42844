//! # Configuration
//!
//! Settings are layered. Highest wins:
//! 1. CLI flags
//! 2. Environment (`TRATTORIA_DATA`, `TRATTORIA_LOG_FORMAT`)
//! 3. TOML config file (`--config`)
//! 4. Built-in defaults
//!
//! ```toml
//! data_path = "trattoria.bin"
//! log_format = "json"
//!
//! [restaurant]
//! name = "Da Nonna"
//! default_tax_rate_bp = 1000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use trattoria_core::TrattoriaError;
use trattoria_core::primitives::DEFAULT_TAX_RATE_BP;

/// Default restaurant file.
pub const DEFAULT_DATA_PATH: &str = "trattoria.bin";

/// Largest config file accepted.
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// TYPES
// =============================================================================

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse an environment value. Anything but `json` is text.
    #[must_use]
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Defaults used when the CLI creates records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestaurantDefaults {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate_bp: u16,
}

fn default_name() -> String {
    "Trattoria".to_string()
}

fn default_tax_rate() -> u16 {
    DEFAULT_TAX_RATE_BP
}

impl Default for RestaurantDefaults {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_tax_rate_bp: default_tax_rate(),
        }
    }
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_path: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub restaurant: Option<RestaurantDefaults>,
}

impl FileConfig {
    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, TrattoriaError> {
        toml::from_str(text)
            .map_err(|e| TrattoriaError::InvalidArgument(format!("Invalid config: {}", e)))
    }

    /// Read and parse a config file.
    pub fn read(path: &Path) -> Result<Self, TrattoriaError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            TrattoriaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(TrattoriaError::InvalidArgument(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            TrattoriaError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub log_format: LogFormat,
    pub restaurant: RestaurantDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_format: LogFormat::default(),
            restaurant: RestaurantDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Layer flag, environment and file over the defaults.
    ///
    /// `env` looks up one variable; pass `|k| std::env::var(k).ok()` in
    /// production.
    pub fn resolve(
        data_flag: Option<PathBuf>,
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TrattoriaError> {
        let file = match config_path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(data_flag, file, env))
    }

    /// Apply the precedence rules to an already-parsed file.
    #[must_use]
    pub fn layer(
        data_flag: Option<PathBuf>,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let defaults = Self::default();

        let data_path = data_flag
            .or_else(|| env("TRATTORIA_DATA").map(PathBuf::from))
            .or(file.data_path)
            .unwrap_or(defaults.data_path);

        let log_format = env("TRATTORIA_LOG_FORMAT")
            .map(|v| LogFormat::from_env_value(&v))
            .or(file.log_format)
            .unwrap_or(defaults.log_format);

        Self {
            data_path,
            log_format,
            restaurant: file.restaurant.unwrap_or(defaults.restaurant),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        assert_eq!(FileConfig::parse("").expect("parse"), FileConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(FileConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn env_values() {
        assert_eq!(LogFormat::from_env_value("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value("pretty"), LogFormat::Text);
    }
}
