//! Persistent key/value storage.

use super::SettingsError;

/// String key/value persistence (a JSON file on desktop).
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&self, key: &str, value: &str) -> Result<(), SettingsError>;

    fn remove(&self, key: &str) -> Result<(), SettingsError>;
}
