//! File-backed key/value storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use directories::ProjectDirs;

use crate::infrastructure::ports::{KeyValueStore, SettingsError};

/// Key/value pairs persisted as one JSON object.
///
/// Default location:
/// - Linux: ~/.config/saveforge/storage.json
/// - macOS: ~/Library/Application Support/io.saveforge.saveforge/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\saveforge\saveforge\config\storage.json
pub struct JsonFileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at the platform config location.
    pub fn open_default() -> Self {
        let path = ProjectDirs::from("io", "saveforge", "saveforge")
            .map(|dirs| dirs.config_dir().join("storage.json"))
            // Fallback to current directory if project dirs unavailable
            .unwrap_or_else(|| PathBuf::from("saveforge_storage.json"));
        Self::open(path)
    }

    /// Open the store at `path`, loading existing data if present.
    ///
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "Failed to parse storage file: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to read storage file: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Storage initialized at: {:?}", path);

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, snapshot: &HashMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    fn mutate<F>(&self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let snapshot = {
            let mut guard = self
                .cache
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut guard);
            guard.clone()
        };
        self.persist(&snapshot)
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.mutate(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.mutate(|map| {
            map.remove(key);
        })
    }
}

/// In-memory store for tests.
#[cfg(any(test, feature = "testing"))]
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

#[cfg(any(test, feature = "testing"))]
impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let store = JsonFileStore::open(&path);
        store.save("theme", "dark").expect("save");
        assert_eq!(store.load("theme").as_deref(), Some("dark"));

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.load("theme").as_deref(), Some("dark"));

        reopened.remove("theme").expect("remove");
        assert_eq!(JsonFileStore::open(&path).load("theme"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").expect("write");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.load("anything"), None);
        store.save("k", "v").expect("save over corrupt file");
        assert_eq!(JsonFileStore::open(&path).load("k").as_deref(), Some("v"));
    }
}
