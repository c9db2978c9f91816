//! Settings store protocol definitions.
//!
//! Settings are external, persisted key/value pairs. Readers always go through
//! the async `get`, writers broadcast a [`SettingsChange`] to every subscriber.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::SettingsError;

/// Storage key of the auto-comment toggle.
pub const AUTO_COMMENTS_KEY: &str = "enableAutoComments";

/// Core trait for settings stores.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read a value. `None` when the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    /// Write a value and notify subscribers.
    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Remove a value and notify subscribers.
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;
}

/// A pushed settings change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsChange {
    pub key: String,
    /// New value, `None` when removed.
    pub value: Option<Value>,
    pub changed_at: DateTime<Utc>,
}

impl SettingsChange {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
            changed_at: Utc::now(),
        }
    }
}

/// Whether automatic comment filling is enabled.
///
/// Absent means enabled: only an explicit `false` disables it.
pub async fn auto_comments_enabled(store: &dyn SettingsStore) -> Result<bool, SettingsError> {
    let value = store.get(AUTO_COMMENTS_KEY).await?;
    Ok(!matches!(value, Some(Value::Bool(false))))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
