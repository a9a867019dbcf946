//! Equip and unequip.

use saveforge_domain::CharacterId;
use saveforge_shared::{paths, EquipRequest, InventoryChangeResponse, UnequipRequest};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct InventoryApi {
    api: Api,
}

impl InventoryApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn equip(
        &self,
        character: &CharacterId,
        item_index: u32,
        slot: &str,
    ) -> Result<InventoryChangeResponse, ApiError> {
        self.api
            .mutate(
                &paths::inventory_equip(character),
                &EquipRequest {
                    item_index,
                    slot: slot.to_string(),
                },
            )
            .await
    }

    pub async fn unequip(
        &self,
        character: &CharacterId,
        slot: &str,
    ) -> Result<InventoryChangeResponse, ApiError> {
        self.api
            .mutate(
                &paths::inventory_unequip(character),
                &UnequipRequest {
                    slot: slot.to_string(),
                },
            )
            .await
    }
}
