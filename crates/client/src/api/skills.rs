//! Skill ranks.

use saveforge_domain::CharacterId;
use saveforge_shared::{paths, SkillRankUpdateRequest, SkillUpdateResponse};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct SkillsApi {
    api: Api,
}

impl SkillsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn set_rank(
        &self,
        character: &CharacterId,
        skill_id: u32,
        rank: i32,
    ) -> Result<SkillUpdateResponse, ApiError> {
        self.api
            .mutate(
                &paths::skills_update(character),
                &SkillRankUpdateRequest::single(skill_id, rank),
            )
            .await
    }
}
