//! Ability scores, combat stats and saving throw bonuses.

use saveforge_domain::{Ability, CharacterId, MiscStat, SubsystemName};
use saveforge_shared::{
    paths, AttributeChangeResponse, AttributeUpdateRequest, MiscBonusRequest, MiscBonusResponse,
};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct AttributesApi {
    api: Api,
}

impl AttributesApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Set one base ability score.
    pub async fn update_ability(
        &self,
        character: &CharacterId,
        ability: Ability,
        value: i32,
    ) -> Result<AttributeChangeResponse, ApiError> {
        self.api
            .mutate(
                &paths::attributes_update(character),
                &AttributeUpdateRequest::single(ability, value),
            )
            .await
    }

    /// Set the misc bonus of a combat stat or saving throw.
    pub async fn set_misc_bonus(
        &self,
        character: &CharacterId,
        stat: MiscStat,
        value: i32,
    ) -> Result<MiscBonusResponse, ApiError> {
        let path = match stat.subsystem() {
            SubsystemName::Saves => paths::saves_misc_bonus(character),
            _ => paths::combat_misc_bonus(character),
        };
        self.api
            .mutate(&path, &MiscBonusRequest { stat, value })
            .await
    }
}
