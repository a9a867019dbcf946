//! Base ability scores.

use std::collections::BTreeMap;

use serde::Deserialize;

use saveforge_domain::{calculate_modifier, clamp_ability_score, Ability, SubsystemName};

use super::{require_character, EditError, EditOutcome, Optimistic, Settled};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::SubsystemCache;

/// Subsystems whose derived values depend on ability scores.
pub const ABILITY_DEPENDENTS: [SubsystemName; 3] = [
    SubsystemName::Combat,
    SubsystemName::Saves,
    SubsystemName::Skills,
];

/// Typed view of the `abilityScores` subsystem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AbilityScoresView {
    #[serde(default)]
    pub base: BTreeMap<Ability, i32>,
    /// Base plus racial and item bonuses.
    #[serde(default)]
    pub effective: BTreeMap<Ability, i32>,
}

impl AbilityScoresView {
    fn bonus(&self, ability: Ability) -> i32 {
        match (self.effective.get(&ability), self.base.get(&ability)) {
            (Some(effective), Some(base)) => effective - base,
            _ => 0,
        }
    }
}

#[derive(Clone)]
pub struct AbilityScoreEditor {
    api: Api,
    engine: Optimistic<Ability>,
}

impl AbilityScoreEditor {
    pub fn new(api: Api, cache: SubsystemCache) -> Self {
        Self {
            api,
            engine: Optimistic::new(cache),
        }
    }

    pub fn with_notifications(mut self, toasts: Toasts) -> Self {
        self.engine = self.engine.with_notifications(toasts);
        self
    }

    fn view(&self) -> Option<AbilityScoresView> {
        self.engine.cache().typed(SubsystemName::AbilityScores)
    }

    fn pending_base(&self, ability: Ability) -> Option<i32> {
        self.engine
            .override_value(ability, SubsystemName::AbilityScores)
    }

    /// Base score, including a pending or unconfirmed edit.
    pub fn base_score(&self, ability: Ability) -> Option<i32> {
        self.pending_base(ability)
            .or_else(|| self.view()?.base.get(&ability).copied())
    }

    /// Effective score: base plus the bonuses the backend last reported.
    pub fn effective_score(&self, ability: Ability) -> Option<i32> {
        let view = self.view().unwrap_or_default();
        match self.pending_base(ability) {
            Some(base) => Some(base + view.bonus(ability)),
            None => view
                .effective
                .get(&ability)
                .or_else(|| view.base.get(&ability))
                .copied(),
        }
    }

    pub fn modifier(&self, ability: Ability) -> Option<i32> {
        self.effective_score(ability).map(calculate_modifier)
    }

    pub fn is_pending(&self, ability: Ability) -> bool {
        self.engine.is_pending(ability)
    }

    /// Set a base score, clamped to the legal range.
    pub async fn set_base_score(
        &self,
        ability: Ability,
        requested: i32,
    ) -> Result<EditOutcome, EditError> {
        let character = require_character(self.engine.cache())?;
        let value = clamp_ability_score(requested);
        if value != requested {
            tracing::debug!(ability = ability.short_name(), requested, value, "Clamped ability score");
        }

        let attributes = self.api.attributes();
        let settled = self
            .engine
            .run(ability, value, async move {
                attributes.update_ability(&character, ability, value).await
            })
            .await?;

        let Settled::Latest { response, epoch } = settled else {
            return Ok(EditOutcome::Superseded);
        };
        let cache = self.engine.cache();
        if let Some(scores) = response.ability_scores {
            cache.update_data_if_current(epoch, SubsystemName::AbilityScores, scores);
        }
        if cache.epoch() == epoch {
            cache.invalidate_subsystems(&ABILITY_DEPENDENTS);
        }
        Ok(EditOutcome::Applied { value })
    }

    /// String entry point; unknown ability names fail before any request.
    pub async fn set_base_score_named(
        &self,
        ability: &str,
        requested: i32,
    ) -> Result<EditOutcome, EditError> {
        let ability: Ability = ability.parse()?;
        self.set_base_score(ability, requested).await
    }

    pub fn dispose(&self) {
        self.engine.dispose();
    }
}
