//! Subsystem fetches for the cache.

use async_trait::async_trait;
use serde_json::Value;

use saveforge_domain::{CharacterId, SubsystemName};
use saveforge_shared::paths;

use super::{Api, ApiError};
use crate::infrastructure::ports::CacheMode;

/// Fetches one subsystem's payload from the source of truth.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubsystemSource: Send + Sync {
    async fn fetch_subsystem(
        &self,
        character: &CharacterId,
        subsystem: SubsystemName,
    ) -> Result<Value, ApiError>;
}

#[async_trait]
impl SubsystemSource for Api {
    async fn fetch_subsystem(
        &self,
        character: &CharacterId,
        subsystem: SubsystemName,
    ) -> Result<Value, ApiError> {
        // Loads are explicit refreshes; never serve them from an HTTP cache.
        self.get_value(&paths::subsystem(character, subsystem), CacheMode::Reload)
            .await
    }
}
