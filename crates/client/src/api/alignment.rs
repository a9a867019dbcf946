//! Alignment axes.

use saveforge_domain::{AlignmentAxis, CharacterId};
use saveforge_shared::{paths, AlignmentResponse, AlignmentUpdateRequest};

use super::{Api, ApiError};

#[derive(Clone)]
pub struct AlignmentApi {
    api: Api,
}

impl AlignmentApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Set one axis; the other is left as stored.
    pub async fn update(
        &self,
        character: &CharacterId,
        axis: AlignmentAxis,
        value: i32,
    ) -> Result<AlignmentResponse, ApiError> {
        self.api
            .mutate(
                &paths::alignment(character),
                &AlignmentUpdateRequest::single(axis, value),
            )
            .await
    }
}
