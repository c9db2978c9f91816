//! Process-local settings store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use feedfill_protocols::{SettingsChange, SettingsError, SettingsStore};

use crate::{validate_key, CHANGE_CHANNEL_CAPACITY};

pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, Value>>,
    changes: broadcast::Sender<SettingsChange>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Store pre-populated with `values`.
    pub fn with_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        let store = Self::new();
        store.values.write().extend(values);
        store
    }

    fn notify(&self, key: &str, value: Option<Value>) {
        // no receivers is fine
        let _ = self.changes.send(SettingsChange::new(key, value));
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        validate_key(key)?;
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        validate_key(key)?;
        debug!("Setting {} = {}", key, value);
        self.values.write().insert(key.to_string(), value.clone());
        self.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        validate_key(key)?;
        if self.values.write().remove(key).is_some() {
            self.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
