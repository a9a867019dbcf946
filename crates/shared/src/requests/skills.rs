use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Skill rank changes keyed by skill id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRankUpdateRequest {
    pub skills: BTreeMap<u32, i32>,
}

impl SkillRankUpdateRequest {
    pub fn single(skill_id: u32, rank: i32) -> Self {
        Self {
            skills: BTreeMap::from([(skill_id, rank)]),
        }
    }
}
