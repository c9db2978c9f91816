//! Settings store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings storage error: {0}")]
    Storage(String),

    #[error("Settings serialization error: {0}")]
    Serialization(String),

    #[error("Invalid settings key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Serialization(e.to_string())
    }
}
