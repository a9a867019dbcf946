//! The active character and its session lifecycle.

use std::sync::RwLock;

use saveforge_domain::{CharacterId, CharacterRef, DomainError};

use crate::api::{Api, ApiError};
use crate::editors::EditError;
use crate::state::SubsystemCache;

/// Owns the loaded character reference and keeps the cache bound to it.
pub struct CharacterContext {
    api: Api,
    cache: SubsystemCache,
    current: RwLock<Option<CharacterRef>>,
}

impl CharacterContext {
    pub fn new(api: Api, cache: SubsystemCache) -> Self {
        Self {
            api,
            cache,
            current: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &SubsystemCache {
        &self.cache
    }

    pub fn current(&self) -> Option<CharacterRef> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn character_id(&self) -> Option<CharacterId> {
        self.current().map(|character| character.id)
    }

    fn replace(&self, character: Option<CharacterRef>) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = character;
    }

    /// Open a save file; the previous character's cached state is dropped.
    pub async fn open_save(&self, file_path: &str) -> Result<CharacterRef, ApiError> {
        let character = self.api.session().load_save(file_path).await?;
        tracing::info!(
            character = %character.id,
            name = %character.name,
            file_path,
            "Save loaded"
        );
        self.cache.bind_character(character.id.clone());
        self.replace(Some(character.clone()));
        Ok(character)
    }

    /// Refetch the character basics (name, classes, gold, saves).
    pub async fn refresh_summary(&self) -> Result<CharacterRef, EditError> {
        let id = self.character_id().ok_or(EditError::NoCharacter)?;
        let epoch = self.cache.epoch();
        let summary = self.api.session().summary(&id).await?;
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }
        self.replace(Some(summary.clone()));
        Ok(summary)
    }

    /// Set gold. Not optimistic: the reference changes only once the backend accepts.
    pub async fn set_gold(&self, gold: i64) -> Result<i64, EditError> {
        if gold < 0 {
            return Err(DomainError::validation("Gold cannot be negative").into());
        }
        let id = self.character_id().ok_or(EditError::NoCharacter)?;
        let epoch = self.cache.epoch();
        let accepted = self.api.session().set_gold(&id, gold).await?;
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(character) = current.as_mut().filter(|c| c.id == id) {
            character.gold = accepted;
        }
        tracing::debug!(character = %id, gold = accepted, "Gold updated");
        Ok(accepted)
    }

    /// Close the session. Local state is cleared even if the backend call fails.
    pub async fn close(&self) -> Result<(), ApiError> {
        let result = self.api.session().close().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Backend session close failed");
        }
        self.replace(None);
        self.cache.reset();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{BackendResponse, HttpMethod};
    use crate::testing::ScriptedTransport;
    use saveforge_domain::SubsystemName;
    use saveforge_shared::paths;
    use serde_json::json;

    fn fighter() -> serde_json::Value {
        json!({
            "id": "pc-1",
            "name": "Casavir",
            "classes": [{"name": "Paladin", "level": 8}],
            "gold": 1200
        })
    }

    fn context() -> (Arc<ScriptedTransport>, CharacterContext) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = Api::new(transport.clone());
        let cache = SubsystemCache::new(Arc::new(api.clone()), Arc::new(SystemClock::new()));
        (transport, CharacterContext::new(api, cache))
    }

    #[tokio::test]
    async fn open_save_binds_cache_and_replaces_reference() {
        let (transport, ctx) = context();
        transport.respond(
            HttpMethod::Post,
            paths::SESSION_LOAD,
            BackendResponse::ok(json!({"success": true, "character": fighter()})),
        );

        let character = ctx.open_save("/saves/quick.zip").await.expect("load");

        assert_eq!(character.name, "Casavir");
        assert_eq!(character.total_level(), 8);
        assert_eq!(ctx.cache().character(), Some(CharacterId::new("pc-1")));
        assert_eq!(ctx.current(), Some(character));
    }

    #[tokio::test]
    async fn negative_gold_is_rejected_before_any_request() {
        let (transport, ctx) = context();
        let err = ctx.set_gold(-5).await.expect_err("negative gold");
        assert!(matches!(err, EditError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn set_gold_requires_a_character() {
        let (_transport, ctx) = context();
        assert!(matches!(
            ctx.set_gold(10).await,
            Err(EditError::NoCharacter)
        ));
    }

    #[tokio::test]
    async fn set_gold_updates_reference_with_accepted_value() {
        let (transport, ctx) = context();
        transport.respond(
            HttpMethod::Post,
            paths::SESSION_LOAD,
            BackendResponse::ok(json!({"character": fighter()})),
        );
        ctx.open_save("save").await.expect("load");
        let id = CharacterId::new("pc-1");
        transport.respond(
            HttpMethod::Post,
            &paths::gold(&id),
            BackendResponse::ok(json!({"gold": 5000})),
        );

        assert_eq!(ctx.set_gold(5000).await.expect("gold"), 5000);
        assert_eq!(ctx.current().map(|c| c.gold), Some(5000));
    }

    #[tokio::test]
    async fn close_clears_state_even_when_backend_fails() {
        let (transport, ctx) = context();
        transport.respond(
            HttpMethod::Post,
            paths::SESSION_LOAD,
            BackendResponse::ok(json!({"character": fighter()})),
        );
        ctx.open_save("save").await.expect("load");
        ctx.cache()
            .update_data(SubsystemName::Combat, json!({"armor_class": 20}));
        transport.respond(
            HttpMethod::Post,
            paths::SESSION_CLOSE,
            BackendResponse::new(500, json!({"detail": "busy"})),
        );

        assert!(ctx.close().await.is_err());
        assert_eq!(ctx.current(), None);
        assert_eq!(ctx.cache().data(SubsystemName::Combat), None);
    }
}
