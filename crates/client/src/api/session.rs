//! Save loading, character summary, gold and backend health.

use saveforge_domain::{CharacterId, CharacterRef};
use saveforge_shared::{
    paths, GoldResponse, GoldUpdateRequest, HealthResponse, LoadSaveRequest, LoadSaveResponse,
};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct SessionApi {
    api: Api,
}

impl SessionApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.api.get(paths::HEALTH).await
    }

    /// Ask the backend to open a save file and return its player character.
    pub async fn load_save(&self, file_path: &str) -> Result<CharacterRef, ApiError> {
        let response: LoadSaveResponse = self
            .api
            .mutate(
                paths::SESSION_LOAD,
                &LoadSaveRequest {
                    file_path: file_path.to_string(),
                },
            )
            .await?;
        Ok(response.character)
    }

    pub async fn close(&self) -> Result<(), ApiError> {
        self.api.post_empty(paths::SESSION_CLOSE).await
    }

    pub async fn summary(&self, character: &CharacterId) -> Result<CharacterRef, ApiError> {
        self.api.get(&paths::summary(character)).await
    }

    pub async fn set_gold(&self, character: &CharacterId, gold: i64) -> Result<i64, ApiError> {
        let response: GoldResponse = self
            .api
            .post(&paths::gold(character), &GoldUpdateRequest { gold })
            .await?;
        Ok(response.gold)
    }
}
