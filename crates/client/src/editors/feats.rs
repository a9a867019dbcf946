//! Feat eligibility, add and remove.
//!
//! Feat changes are not optimistic: the feat list is only updated from the
//! backend's answer, since prerequisites are checked server-side.

use std::sync::Arc;

use saveforge_domain::SubsystemName;
use saveforge_shared::FeatChangeResponse;

use super::{require_character, EditError};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::{FeatEligibility, FeatValidationCache, Refresh, SubsystemCache};

/// Subsystems whose derived values depend on the feat list.
pub const FEAT_DEPENDENTS: [SubsystemName; 3] = [
    SubsystemName::Combat,
    SubsystemName::Saves,
    SubsystemName::Skills,
];

/// A completed feat change and the reloads it started.
#[derive(Debug)]
pub struct FeatChange {
    pub response: FeatChangeResponse,
    pub refresh: Refresh,
}

#[derive(Clone)]
pub struct FeatManager {
    api: Api,
    cache: SubsystemCache,
    validation: Arc<FeatValidationCache>,
    toasts: Option<Toasts>,
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Add,
    Remove,
}

impl FeatManager {
    pub fn new(api: Api, cache: SubsystemCache) -> Self {
        Self {
            api,
            cache,
            validation: Arc::new(FeatValidationCache::new()),
            toasts: None,
        }
    }

    pub fn with_notifications(mut self, toasts: Toasts) -> Self {
        self.toasts = Some(toasts);
        self
    }

    pub fn validation_cache(&self) -> &FeatValidationCache {
        &self.validation
    }

    /// Whether the character may take `feat_id`, memoized until feats change.
    pub async fn check_eligibility(&self, feat_id: u32) -> Result<FeatEligibility, EditError> {
        let character = require_character(&self.cache)?;
        let epoch = self.cache.epoch();
        if let Some(hit) = self.validation.get(epoch, feat_id) {
            return Ok(hit);
        }
        let generation = self.validation.generation(epoch);

        let response = self.api.feats().validate(&character, feat_id).await?;
        let eligibility = FeatEligibility::from(response);
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }
        tracing::debug!(feat_id, can_take = eligibility.can_take, "Feat eligibility checked");
        if !self
            .validation
            .insert(epoch, generation, feat_id, eligibility.clone())
        {
            tracing::debug!(feat_id, "Feat list changed during check; result not cached");
        }
        Ok(eligibility)
    }

    pub async fn add_feat(&self, feat_id: u32) -> Result<FeatChange, EditError> {
        self.change(Change::Add, feat_id).await
    }

    pub async fn remove_feat(&self, feat_id: u32) -> Result<FeatChange, EditError> {
        self.change(Change::Remove, feat_id).await
    }

    async fn change(&self, change: Change, feat_id: u32) -> Result<FeatChange, EditError> {
        let character = require_character(&self.cache)?;
        let epoch = self.cache.epoch();
        let feats = self.api.feats();

        let result = match change {
            Change::Add => feats.add(&character, feat_id).await,
            Change::Remove => feats.remove(&character, feat_id).await,
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(feat_id, ?change, error = %e, "Feat change failed");
                let err = EditError::Api(e);
                if let Some(toasts) = &self.toasts {
                    toasts.mutation_failed(&err);
                }
                return Err(err);
            }
        };
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }

        tracing::info!(feat_id, ?change, character = %character, "Feat list changed");
        self.validation.clear();

        let mut reload: Vec<SubsystemName> = FEAT_DEPENDENTS.to_vec();
        match &response.feats {
            Some(feats) => {
                self.cache
                    .update_data_if_current(epoch, SubsystemName::Feats, feats.clone());
            }
            None => reload.push(SubsystemName::Feats),
        }
        let refresh = self.cache.invalidate_subsystems(&reload);
        Ok(FeatChange { response, refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{BackendResponse, HttpMethod};
    use crate::testing::ScriptedTransport;
    use saveforge_domain::CharacterId;
    use saveforge_shared::paths;
    use serde_json::json;

    fn setup() -> (Arc<ScriptedTransport>, SubsystemCache, FeatManager) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = Api::new(transport.clone());
        let cache = SubsystemCache::new(Arc::new(api.clone()), Arc::new(SystemClock::new()));
        cache.bind_character(CharacterId::new("pc"));
        let manager = FeatManager::new(api, cache.clone());
        (transport, cache, manager)
    }

    fn pc() -> CharacterId {
        CharacterId::new("pc")
    }

    #[tokio::test]
    async fn eligibility_is_memoized_until_feats_change() {
        let (transport, _cache, manager) = setup();
        let validate = paths::feat_validate(&pc(), 7);
        transport.respond(
            HttpMethod::Get,
            &validate,
            BackendResponse::ok(json!({"can_take": false, "missing_requirements": ["Dex 15"]})),
        );
        transport.respond(
            HttpMethod::Post,
            &paths::feats_add(&pc()),
            BackendResponse::ok(json!({"success": true, "feats": {"feats": [3]}})),
        );

        let first = manager.check_eligibility(7).await.expect("check");
        manager.check_eligibility(7).await.expect("cached");
        assert!(!first.can_take);
        assert_eq!(transport.calls(HttpMethod::Get, &validate), 1);

        manager.add_feat(3).await.expect("add");
        assert!(manager.validation_cache().is_empty());
        manager.check_eligibility(7).await.expect("recheck");
        assert_eq!(transport.calls(HttpMethod::Get, &validate), 2);
    }

    #[tokio::test]
    async fn add_applies_feats_payload_and_reloads_dependents() {
        let (transport, cache, manager) = setup();
        transport.respond(
            HttpMethod::Post,
            &paths::feats_add(&pc()),
            BackendResponse::ok(json!({"success": true, "feats": {"feats": [3, 9]}})),
        );
        transport.respond(
            HttpMethod::Get,
            &paths::subsystem(&pc(), SubsystemName::Combat),
            BackendResponse::ok(json!({"armor_class": 19})),
        );

        let change = manager.add_feat(9).await.expect("add");
        assert_eq!(change.refresh.len(), 3);
        change.refresh.wait().await;

        assert_eq!(cache.data(SubsystemName::Feats), Some(json!({"feats": [3, 9]})));
        assert_eq!(cache.data(SubsystemName::Combat), Some(json!({"armor_class": 19})));
        assert_eq!(
            transport.calls(HttpMethod::Get, &paths::subsystem(&pc(), SubsystemName::Feats)),
            0
        );
    }

    #[tokio::test]
    async fn rejected_removal_raises_toast() {
        let (transport, _cache, manager) = setup();
        let toasts = Toasts::new();
        let manager = manager.with_notifications(toasts.clone());
        transport.respond(
            HttpMethod::Post,
            &paths::feats_remove(&pc()),
            BackendResponse::ok(json!({"success": false, "message": "Feat is a prerequisite"})),
        );

        let err = manager.remove_feat(3).await.expect_err("rejected");
        assert_eq!(err.user_message(), "Feat is a prerequisite");
        assert_eq!(toasts.visible().len(), 1);
    }

    #[tokio::test]
    async fn check_in_flight_during_feat_change_is_not_cached() {
        let (transport, _cache, manager) = setup();
        let validate = paths::feat_validate(&pc(), 7);
        let gate = transport.gate(HttpMethod::Get, &validate);
        transport.respond(
            HttpMethod::Post,
            &paths::feats_add(&pc()),
            BackendResponse::ok(json!({"success": true, "feats": {"feats": [3]}})),
        );

        let check = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.check_eligibility(7).await })
        };
        while transport.calls(HttpMethod::Get, &validate) == 0 {
            tokio::task::yield_now().await;
        }

        manager.add_feat(3).await.expect("add");
        gate.respond(BackendResponse::ok(
            json!({"can_take": false, "missing_requirements": ["Power Attack"]}),
        ));
        let stale = check.await.expect("join").expect("check");
        assert!(!stale.can_take);
        assert!(manager.validation_cache().is_empty());

        transport.respond(
            HttpMethod::Get,
            &validate,
            BackendResponse::ok(json!({"can_take": true})),
        );
        let fresh = manager.check_eligibility(7).await.expect("recheck");
        assert!(fresh.can_take);
        assert_eq!(transport.calls(HttpMethod::Get, &validate), 2);
    }
}
