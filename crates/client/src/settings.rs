//! Persisted user settings.
//!
//! Stored as one JSON blob under [`storage_keys::SETTINGS`] in the key/value
//! store. Read once at startup; written back on every change.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{KeyValueStore, SettingsError};

/// Storage keys used by the client.
pub mod storage_keys {
    pub const SETTINGS: &str = "saveforge_settings";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Game installation root chosen by the user; detected when unset.
    pub game_install_path: Option<PathBuf>,
    /// Launch the game after saving a character.
    pub auto_launch_game: bool,
    /// Close the editor once the game has been launched.
    pub auto_close_after_launch: bool,
}

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Read settings from `store`. Missing or corrupt data yields defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.load(storage_keys::SETTINGS) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored settings are unreadable, using defaults");
                UserSettings::default()
            }),
            None => UserSettings::default(),
        };
        tracing::debug!(?current, "Settings loaded");
        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub fn get(&self) -> UserSettings {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `change` and persist the result.
    ///
    /// The in-memory value is only replaced once the write succeeds.
    pub fn update<F>(&self, change: F) -> Result<UserSettings, SettingsError>
    where
        F: FnOnce(&mut UserSettings),
    {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = current.clone();
        change(&mut next);
        if next == *current {
            return Ok(next);
        }

        let raw = serde_json::to_string(&next)?;
        self.store.save(storage_keys::SETTINGS, &raw)?;
        *current = next.clone();
        Ok(next)
    }

    /// Forget stored settings and return to defaults.
    pub fn reset(&self) -> Result<(), SettingsError> {
        self.store.remove(storage_keys::SETTINGS)?;
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = UserSettings::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{JsonFileStore, MemoryStore};

    #[test]
    fn defaults_when_nothing_is_stored() {
        let settings = SettingsStore::load(Arc::new(MemoryStore::default()));
        assert_eq!(settings.get(), UserSettings::default());
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::default());
        store.save(storage_keys::SETTINGS, "{oops").expect("save");
        let settings = SettingsStore::load(store);
        assert!(!settings.get().auto_launch_game);
    }

    #[test]
    fn update_persists_across_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");

        let settings = SettingsStore::load(Arc::new(JsonFileStore::open(&path)));
        let updated = settings
            .update(|s| {
                s.auto_launch_game = true;
                s.game_install_path = Some(PathBuf::from("/games/nwn2"));
            })
            .expect("update");
        assert!(updated.auto_launch_game);

        let reloaded = SettingsStore::load(Arc::new(JsonFileStore::open(&path)));
        assert_eq!(reloaded.get(), updated);

        reloaded.reset().expect("reset");
        let after_reset = SettingsStore::load(Arc::new(JsonFileStore::open(&path)));
        assert_eq!(after_reset.get(), UserSettings::default());
    }

    #[test]
    fn partial_blob_fills_missing_fields() {
        let store = Arc::new(MemoryStore::default());
        store
            .save(storage_keys::SETTINGS, r#"{"auto_close_after_launch": true}"#)
            .expect("save");
        let settings = SettingsStore::load(store).get();
        assert!(settings.auto_close_after_launch);
        assert_eq!(settings.game_install_path, None);
    }
}
