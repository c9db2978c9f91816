//! JSON-file settings store.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use feedfill_protocols::{SettingsChange, SettingsError, SettingsStore};

use crate::{validate_key, CHANGE_CHANNEL_CAPACITY};

/// Settings persisted as a single JSON object.
///
/// The file is rewritten on every change. Other processes may write it too:
/// every read checks the file stamp and reloads when it moved, announcing
/// each changed key on the change feed. A missing file is an empty store.
pub struct FileSettingsStore {
    path: PathBuf,
    state: RwLock<Cached>,
    changes: broadcast::Sender<SettingsChange>,
}

#[derive(Default)]
struct Cached {
    values: Map<String, Value>,
    stamp: Option<FileStamp>,
}

/// Modification time and length of the file as last seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileSettingsStore {
    /// Open the store at `path`. A leading `~` is expanded.
    pub async fn open(path: &str) -> Result<Self, SettingsError> {
        let path = PathBuf::from(shellexpand::tilde(path).as_ref());
        let stamp = Self::stamp(&path).await?;
        let values = Self::load(&path).await?;
        info!("Loaded {} settings from {:?}", values.len(), path);

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            state: RwLock::new(Cached { values, stamp }),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every stored value.
    pub async fn entries(&self) -> Map<String, Value> {
        self.refresh().await;
        self.state.read().await.values.clone()
    }

    async fn stamp(path: &Path) -> Result<Option<FileStamp>, SettingsError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(Some(FileStamp {
                modified: meta.modified().ok(),
                len: meta.len(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn refresh(&self) {
        let mut state = self.state.write().await;
        self.refresh_locked(&mut state).await;
    }

    /// Reload the file if another writer touched it since we last looked.
    async fn refresh_locked(&self, state: &mut Cached) {
        if let Err(e) = self.reload_if_changed(state).await {
            // keep serving the last good copy, retry on the next read
            warn!("Failed to reload settings from {:?}: {}", self.path, e);
        }
    }

    async fn reload_if_changed(&self, state: &mut Cached) -> Result<(), SettingsError> {
        let stamp = Self::stamp(&self.path).await?;
        if stamp == state.stamp {
            return Ok(());
        }

        let values = Self::load(&self.path).await?;
        let changed = changed_keys(&state.values, &values);
        debug!(
            "Reloaded settings from {:?}, {} key(s) changed",
            self.path,
            changed.len()
        );
        for key in &changed {
            self.notify(key, values.get(key).cloned());
        }
        state.values = values;
        state.stamp = stamp;
        Ok(())
    }

    async fn load(path: &Path) -> Result<Map<String, Value>, SettingsError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(SettingsError::Serialization(format!(
                "expected a JSON object in {:?}, found {}",
                path,
                kind_of(&other)
            ))),
        }
    }

    /// Write through a sibling temp file so readers never see a partial file.
    async fn save(&self, values: &Map<String, Value>) -> Result<Option<FileStamp>, SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(values)?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;
        debug!("Saved settings to {:?}", self.path);
        Self::stamp(&self.path).await
    }

    fn notify(&self, key: &str, value: Option<Value>) {
        let _ = self.changes.send(SettingsChange::new(key, value));
    }
}

fn changed_keys(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = new
        .iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.extend(old.keys().filter(|key| !new.contains_key(*key)).cloned());
    keys
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    fn id(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        validate_key(key)?;
        self.refresh().await;
        Ok(self.state.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        validate_key(key)?;
        let mut state = self.state.write().await;
        self.refresh_locked(&mut state).await;

        let mut values = state.values.clone();
        values.insert(key.to_string(), value.clone());
        // memory only moves once the disk agrees
        state.stamp = self.save(&values).await?;
        state.values = values;
        drop(state);

        self.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        validate_key(key)?;
        let mut state = self.state.write().await;
        self.refresh_locked(&mut state).await;
        if !state.values.contains_key(key) {
            return Ok(());
        }

        let mut values = state.values.clone();
        values.remove(key);
        state.stamp = self.save(&values).await?;
        state.values = values;
        drop(state);

        self.notify(key, None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}

impl std::fmt::Debug for FileSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSettingsStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
