//! Equipment and carried weight.

use serde::Deserialize;

use saveforge_domain::{Encumbrance, SubsystemName};
use saveforge_shared::InventoryChangeResponse;

use super::{require_character, EditError};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::{Refresh, SubsystemCache};

/// Subsystems whose derived values depend on worn equipment.
pub const EQUIPMENT_DEPENDENTS: [SubsystemName; 2] =
    [SubsystemName::Combat, SubsystemName::AbilityScores];

#[derive(Debug, Clone, Default, Deserialize)]
struct InventoryView {
    #[serde(default)]
    encumbrance: Option<Encumbrance>,
}

/// A completed equip or unequip and the reloads it started.
#[derive(Debug)]
pub struct InventoryChange {
    pub response: InventoryChangeResponse,
    pub refresh: Refresh,
}

#[derive(Clone)]
pub struct InventoryManager {
    api: Api,
    cache: SubsystemCache,
    toasts: Option<Toasts>,
}

impl InventoryManager {
    pub fn new(api: Api, cache: SubsystemCache) -> Self {
        Self {
            api,
            cache,
            toasts: None,
        }
    }

    pub fn with_notifications(mut self, toasts: Toasts) -> Self {
        self.toasts = Some(toasts);
        self
    }

    /// Carried weight against limits. `None` until the inventory is loaded.
    pub fn encumbrance(&self) -> Option<Encumbrance> {
        self.cache
            .typed::<InventoryView>(SubsystemName::Inventory)?
            .encumbrance
    }

    pub async fn equip(&self, item_index: u32, slot: &str) -> Result<InventoryChange, EditError> {
        let character = require_character(&self.cache)?;
        let epoch = self.cache.epoch();
        let result = self
            .api
            .inventory()
            .equip(&character, item_index, slot)
            .await;
        self.settle(epoch, result, slot)
    }

    pub async fn unequip(&self, slot: &str) -> Result<InventoryChange, EditError> {
        let character = require_character(&self.cache)?;
        let epoch = self.cache.epoch();
        let result = self.api.inventory().unequip(&character, slot).await;
        self.settle(epoch, result, slot)
    }

    fn settle(
        &self,
        epoch: u64,
        result: Result<InventoryChangeResponse, crate::api::ApiError>,
        slot: &str,
    ) -> Result<InventoryChange, EditError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(slot, error = %e, "Equipment change failed");
                let err = EditError::Api(e);
                if let Some(toasts) = &self.toasts {
                    toasts.mutation_failed(&err);
                }
                return Err(err);
            }
        };
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }

        let mut reload = EQUIPMENT_DEPENDENTS.to_vec();
        match &response.inventory {
            Some(inventory) => {
                self.cache
                    .update_data_if_current(epoch, SubsystemName::Inventory, inventory.clone());
            }
            None => reload.push(SubsystemName::Inventory),
        }
        let refresh = self.cache.invalidate_subsystems(&reload);
        Ok(InventoryChange { response, refresh })
    }
}
