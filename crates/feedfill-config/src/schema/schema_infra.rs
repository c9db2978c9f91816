//! Settings storage and logging configuration.

use serde::{Deserialize, Serialize};

/// Settings store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// JSON file holding the persisted settings.
    #[serde(default = "default_settings_path")]
    pub path: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

fn default_settings_path() -> String {
    "~/.feedfill/settings.json".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for the rolling log file. No file output when unset.
    #[serde(default)]
    pub directory: Option<String>,

    /// Emit console logs as JSON.
    #[serde(default)]
    pub json: bool,

    /// Rolling files to keep.
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
            json: false,
            max_log_files: default_max_log_files(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    7
}
