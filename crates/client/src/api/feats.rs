//! Feat eligibility, add and remove.

use saveforge_domain::CharacterId;
use saveforge_shared::{paths, FeatChangeRequest, FeatChangeResponse, FeatValidationResponse};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct FeatsApi {
    api: Api,
}

impl FeatsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn validate(
        &self,
        character: &CharacterId,
        feat_id: u32,
    ) -> Result<FeatValidationResponse, ApiError> {
        self.api
            .get(&paths::feat_validate(character, feat_id))
            .await
    }

    pub async fn add(
        &self,
        character: &CharacterId,
        feat_id: u32,
    ) -> Result<FeatChangeResponse, ApiError> {
        self.api
            .mutate(&paths::feats_add(character), &FeatChangeRequest { feat_id })
            .await
    }

    pub async fn remove(
        &self,
        character: &CharacterId,
        feat_id: u32,
    ) -> Result<FeatChangeResponse, ApiError> {
        self.api
            .mutate(&paths::feats_remove(character), &FeatChangeRequest { feat_id })
            .await
    }
}
