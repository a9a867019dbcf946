//! Skill ranks and the skill point ledger.

use serde::Deserialize;
use serde_json::Value;

use saveforge_domain::{
    clamp_skill_rank, max_skill_rank, skill_point_cost, DomainError, SkillAllocation,
    SkillPointLedger, SubsystemName,
};

use super::{require_character, EditError, EditOutcome, Optimistic, Settled};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::SubsystemCache;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub class_skill: bool,
    /// Backend-computed cap; derived from the character level when absent.
    #[serde(default)]
    pub max_rank: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SkillSummary {
    #[serde(default)]
    pub total_points: Option<i32>,
    #[serde(default)]
    pub spent_points: i32,
    #[serde(default)]
    pub available_points: i32,
}

impl SkillSummary {
    pub fn pool(&self) -> i32 {
        self.total_points
            .unwrap_or(self.spent_points + self.available_points)
    }
}

/// Typed view of the `skills` subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkillsView {
    #[serde(default)]
    pub character_level: u32,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub summary: Option<SkillSummary>,
}

impl SkillsView {
    fn entry(&self, skill_id: u32) -> Option<&SkillEntry> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    fn max_rank_of(&self, entry: &SkillEntry) -> i32 {
        entry
            .max_rank
            .unwrap_or_else(|| max_skill_rank(self.character_level, entry.class_skill))
    }
}

#[derive(Clone)]
pub struct SkillEditor {
    api: Api,
    engine: Optimistic<u32>,
}

impl SkillEditor {
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

    fn view(&self) -> Option<SkillsView> {
        self.engine.cache().typed(SubsystemName::Skills)
    }

    pub fn rank(&self, skill_id: u32) -> Option<i32> {
        self.engine
            .override_value(skill_id, SubsystemName::Skills)
            .or_else(|| Some(self.view()?.entry(skill_id)?.rank))
    }

    pub fn max_rank(&self, skill_id: u32) -> Option<i32> {
        let view = self.view()?;
        let entry = view.entry(skill_id)?;
        Some(view.max_rank_of(entry))
    }

    pub fn is_pending(&self, skill_id: u32) -> bool {
        self.engine.is_pending(skill_id)
    }

    /// Every skill with pending ranks applied.
    pub fn skills(&self) -> Vec<SkillEntry> {
        let Some(view) = self.view() else {
            return Vec::new();
        };
        view.skills
            .into_iter()
            .map(|mut entry| {
                if let Some(rank) = self.engine.override_value(entry.id, SubsystemName::Skills) {
                    entry.rank = rank;
                }
                entry
            })
            .collect()
    }

    /// Point usage including pending edits. `None` until skills are loaded.
    pub fn point_ledger(&self) -> Option<SkillPointLedger> {
        let view = self.view()?;
        let pool = view.summary.map_or_else(
            || {
                view.skills
                    .iter()
                    .map(|s| skill_point_cost(s.rank, s.class_skill))
                    .sum::<i32>()
            },
            |summary| summary.pool(),
        );
        let allocations = self.skills().into_iter().map(|s| SkillAllocation {
            rank: s.rank,
            class_skill: s.class_skill,
        });
        Some(SkillPointLedger::from_allocations(pool, allocations))
    }

    /// Set a skill's rank, clamped to `0..=max_rank`.
    pub async fn set_rank(&self, skill_id: u32, requested: i32) -> Result<EditOutcome, EditError> {
        let character = require_character(self.engine.cache())?;
        let view = self
            .view()
            .ok_or_else(|| DomainError::validation("Skills are not loaded"))?;
        let entry = view
            .entry(skill_id)
            .ok_or_else(|| DomainError::unknown_field("skill", skill_id.to_string()))?;
        let value = clamp_skill_rank(requested, view.max_rank_of(entry));

        let skills = self.api.skills();
        let settled = self
            .engine
            .run(skill_id, value, async move {
                skills.set_rank(&character, skill_id, value).await
            })
            .await?;

        let Settled::Latest { response, epoch } = settled else {
            return Ok(EditOutcome::Superseded);
        };
        if let Some(summary) = response.skill_summary {
            self.merge_summary(epoch, summary);
        }
        Ok(EditOutcome::Applied { value })
    }

    /// Fold a returned `skill_summary` into the cached skills payload.
    fn merge_summary(&self, epoch: u64, summary: Value) {
        let cache = self.engine.cache();
        let mut data = cache
            .data(SubsystemName::Skills)
            .unwrap_or_else(|| Value::Object(Default::default()));
        match &mut data {
            Value::Object(fields) => {
                fields.insert("summary".to_string(), summary);
                cache.update_data_if_current(epoch, SubsystemName::Skills, data);
            }
            _ => {
                tracing::warn!("Skills payload is not an object; summary not merged");
            }
        }
    }

    pub fn dispose(&self) {
        self.engine.dispose();
    }
}
