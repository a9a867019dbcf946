//! Application state and composition.

use std::sync::Arc;

use crate::api::Api;
use crate::config::ClientConfig;
use crate::editors::{
    AbilityScoreEditor, AlignmentEditor, AttributeEditor, FeatManager, InventoryManager,
    SkillEditor,
};
use crate::infrastructure::{
    clock::SystemClock,
    http::HttpClient,
    locator::locator_for,
    platform::DesktopPlatform,
    ports::{BackendTransport, ClockPort, KeyValueStore, TransportError},
    storage::JsonFileStore,
};
use crate::notifications::Toasts;
use crate::settings::SettingsStore;
use crate::state::{CharacterContext, SubsystemCache};

/// Main application state.
///
/// One instance per editor window. Editors are created per view and share the
/// cache, the toast queue and the active character through it.
pub struct App {
    pub api: Api,
    pub cache: SubsystemCache,
    pub character: CharacterContext,
    pub toasts: Toasts,
    pub settings: SettingsStore,
}

impl App {
    /// Wire the production stack described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let locator = locator_for(&config.backend)?;
        let http: Arc<dyn BackendTransport> = Arc::new(HttpClient::from_config(locator, config));
        let store: Arc<dyn KeyValueStore> = match &config.settings_path {
            Some(path) => Arc::new(JsonFileStore::open(path)),
            None => Arc::new(JsonFileStore::open_default()),
        };
        Ok(Self::new(http, store, Arc::new(SystemClock::new())))
    }

    pub fn new(
        transport: Arc<dyn BackendTransport>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let api = Api::new(transport);
        let cache = SubsystemCache::new(Arc::new(api.clone()), clock);
        let character = CharacterContext::new(api.clone(), cache.clone());
        Self {
            api,
            cache,
            character,
            toasts: Toasts::new(),
            settings: SettingsStore::load(store),
        }
    }

    pub fn ability_scores(&self) -> AbilityScoreEditor {
        AbilityScoreEditor::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn attributes(&self) -> AttributeEditor {
        AttributeEditor::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn skills(&self) -> SkillEditor {
        SkillEditor::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn alignment(&self) -> AlignmentEditor {
        AlignmentEditor::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn feats(&self) -> FeatManager {
        FeatManager::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn inventory(&self) -> InventoryManager {
        InventoryManager::new(self.api.clone(), self.cache.clone())
            .with_notifications(self.toasts.clone())
    }

    pub fn platform(&self) -> DesktopPlatform {
        DesktopPlatform::new(&self.api)
    }
}
