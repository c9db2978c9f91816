//! Settings subcommand handlers for FeedFill.

use feedfill_config::Config;
use feedfill_protocols::SettingsStore;
use feedfill_settings::FileSettingsStore;

use crate::adapters::parse_setting_value;
use crate::cli::SettingsAction;

/// Handle settings subcommands against the configured settings file.
pub(crate) async fn handle_settings_command(
    config: &Config,
    action: SettingsAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileSettingsStore::open(&config.settings.path).await?;
    println!("{}", apply(&store, action).await?);
    Ok(())
}

/// Apply one action and describe the result.
async fn apply(
    store: &FileSettingsStore,
    action: SettingsAction,
) -> Result<String, Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Get { key } => Ok(match store.get(&key).await? {
            Some(value) => value.to_string(),
            None => format!("{} is not set", key),
        }),
        SettingsAction::Set { key, value } => {
            let value = parse_setting_value(&value);
            store.set(&key, value.clone()).await?;
            Ok(format!("{} = {}", key, value))
        }
        SettingsAction::Remove { key } => {
            store.remove(&key).await?;
            Ok(format!("{} removed", key))
        }
        SettingsAction::List => Ok(serde_json::to_string_pretty(&store.entries().await)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedfill_protocols::auto_comments_enabled;

    async fn store(dir: &tempfile::TempDir) -> FileSettingsStore {
        let path = dir.path().join("settings.json");
        FileSettingsStore::open(&path.to_string_lossy()).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let set = SettingsAction::Set {
            key: "enableAutoComments".into(),
            value: "false".into(),
        };
        assert_eq!(apply(&store, set).await.unwrap(), "enableAutoComments = false");
        assert!(!auto_comments_enabled(&store).await.unwrap());

        let get = SettingsAction::Get {
            key: "enableAutoComments".into(),
        };
        assert_eq!(apply(&store, get).await.unwrap(), "false");

        let remove = SettingsAction::Remove {
            key: "enableAutoComments".into(),
        };
        apply(&store, remove).await.unwrap();
        assert!(auto_comments_enabled(&store).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let get = SettingsAction::Get { key: "nope".into() };
        assert_eq!(apply(&store, get).await.unwrap(), "nope is not set");
    }

    #[tokio::test]
    async fn test_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let set = SettingsAction::Set {
            key: "theme".into(),
            value: "dark".into(),
        };
        apply(&store, set).await.unwrap();
        let listed = apply(&store, SettingsAction::List).await.unwrap();
        assert!(listed.contains("\"theme\": \"dark\""));
    }
}
