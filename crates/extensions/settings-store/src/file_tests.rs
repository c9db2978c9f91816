use super::*;
use feedfill_protocols::{auto_comments_enabled, AUTO_COMMENTS_KEY};
use serde_json::json;
use tempfile::TempDir;

fn settings_path(dir: &TempDir) -> String {
    dir.path().join("settings.json").to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_missing_file_is_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = FileSettingsStore::open(&settings_path(&dir)).await.unwrap();

    assert!(store.entries().await.is_empty());
    assert!(auto_comments_enabled(&store).await.unwrap());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_values_persist_across_opens() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);

    let store = FileSettingsStore::open(&path).await.unwrap();
    store.set(AUTO_COMMENTS_KEY, json!(false)).await.unwrap();
    store.set("apiEndpoint", json!("http://127.0.0.1:5000")).await.unwrap();
    drop(store);

    let reopened = FileSettingsStore::open(&path).await.unwrap();
    assert!(!auto_comments_enabled(&reopened).await.unwrap());
    assert_eq!(
        reopened.get("apiEndpoint").await.unwrap(),
        Some(json!("http://127.0.0.1:5000"))
    );
}

#[tokio::test]
async fn test_remove_persists() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);

    let store = FileSettingsStore::open(&path).await.unwrap();
    store.set(AUTO_COMMENTS_KEY, json!(false)).await.unwrap();
    store.remove(AUTO_COMMENTS_KEY).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let on_disk: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(on_disk, json!({}));
}

#[tokio::test]
async fn test_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/settings.json");

    let store = FileSettingsStore::open(&path.to_string_lossy()).await.unwrap();
    store.set("k", json!(1)).await.unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_reads_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, r#"{"enableAutoComments": false, "other": [1, 2]}"#).unwrap();

    let store = FileSettingsStore::open(&path).await.unwrap();
    assert_eq!(store.entries().await.len(), 2);
    assert!(!auto_comments_enabled(&store).await.unwrap());
}

#[tokio::test]
async fn test_empty_file_is_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, "  \n").unwrap();

    let store = FileSettingsStore::open(&path).await.unwrap();
    assert!(store.entries().await.is_empty());
}

#[tokio::test]
async fn test_non_object_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, "[true]").unwrap();

    let err = FileSettingsStore::open(&path).await.unwrap_err();
    assert!(matches!(err, SettingsError::Serialization(_)));
    assert!(err.to_string().contains("an array"));
}

#[tokio::test]
async fn test_malformed_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        FileSettingsStore::open(&path).await,
        Err(SettingsError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_change_notifications() {
    let dir = TempDir::new().unwrap();
    let store = FileSettingsStore::open(&settings_path(&dir)).await.unwrap();
    let mut changes = store.subscribe();

    store.set(AUTO_COMMENTS_KEY, json!(true)).await.unwrap();
    let change = changes.recv().await.unwrap();
    assert_eq!(change.key, AUTO_COMMENTS_KEY);
    assert_eq!(change.value, Some(json!(true)));

    // removing an absent key writes nothing
    store.remove("never-set").await.unwrap();
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_write_rolls_back() {
    let dir = TempDir::new().unwrap();
    // a directory where the file should be makes the rename fail
    let path = dir.path().join("settings.json");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    let store = FileSettingsStore {
        path: path.clone(),
        state: RwLock::new(Cached::default()),
        changes: broadcast::channel(4).0,
    };
    assert!(store.set("k", json!(1)).await.is_err());
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_sees_writes_from_another_store() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);

    let running = FileSettingsStore::open(&path).await.unwrap();
    let mut changes = running.subscribe();
    assert!(auto_comments_enabled(&running).await.unwrap());

    // a second process sharing the same file
    let cli = FileSettingsStore::open(&path).await.unwrap();
    cli.set(AUTO_COMMENTS_KEY, json!(false)).await.unwrap();

    assert!(!auto_comments_enabled(&running).await.unwrap());
    let change = changes.try_recv().unwrap();
    assert_eq!(change.key, AUTO_COMMENTS_KEY);
    assert_eq!(change.value, Some(json!(false)));

    cli.remove(AUTO_COMMENTS_KEY).await.unwrap();
    assert!(running.entries().await.is_empty());
    let change = changes.try_recv().unwrap();
    assert_eq!(change.key, AUTO_COMMENTS_KEY);
    assert_eq!(change.value, None);
}

#[tokio::test]
async fn test_unchanged_file_is_not_announced() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, r#"{"enableAutoComments": true}"#).unwrap();

    let store = FileSettingsStore::open(&path).await.unwrap();
    let mut changes = store.subscribe();
    store.get(AUTO_COMMENTS_KEY).await.unwrap();
    store.get(AUTO_COMMENTS_KEY).await.unwrap();
    assert!(changes.try_recv().is_err());

    // own writes are not announced twice
    store.set("other", json!(1)).await.unwrap();
    assert_eq!(changes.try_recv().unwrap().key, "other");
    store.get("other").await.unwrap();
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn test_set_keeps_external_keys() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);

    let running = FileSettingsStore::open(&path).await.unwrap();
    let cli = FileSettingsStore::open(&path).await.unwrap();
    cli.set(AUTO_COMMENTS_KEY, json!(false)).await.unwrap();
    running.set("apiEndpoint", json!("http://127.0.0.1:5000")).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let on_disk: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        on_disk,
        json!({"enableAutoComments": false, "apiEndpoint": "http://127.0.0.1:5000"})
    );
}

#[tokio::test]
async fn test_broken_external_write_keeps_last_values() {
    let dir = TempDir::new().unwrap();
    let path = settings_path(&dir);
    std::fs::write(&path, r#"{"enableAutoComments": false}"#).unwrap();

    let store = FileSettingsStore::open(&path).await.unwrap();
    std::fs::write(&path, "{ half written").unwrap();

    assert_eq!(
        store.get(AUTO_COMMENTS_KEY).await.unwrap(),
        Some(json!(false))
    );
}
