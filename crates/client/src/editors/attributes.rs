//! Misc bonuses on armor class, initiative and saving throws.

use std::collections::BTreeMap;

use serde::Deserialize;

use saveforge_domain::{clamp_misc_bonus, MiscStat, SubsystemName};

use super::{require_character, EditError, EditOutcome, Optimistic, Settled};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::SubsystemCache;

/// The part of the `combat` and `saves` payloads this editor reads.
#[derive(Debug, Clone, Default, Deserialize)]
struct MiscBonusView {
    #[serde(default)]
    misc_bonuses: BTreeMap<MiscStat, i32>,
}

#[derive(Clone)]
pub struct AttributeEditor {
    api: Api,
    engine: Optimistic<MiscStat>,
}

impl AttributeEditor {
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

    /// Current misc bonus. `None` until the owning subsystem is loaded.
    pub fn misc_bonus(&self, stat: MiscStat) -> Option<i32> {
        let subsystem = stat.subsystem();
        if let Some(value) = self.engine.override_value(stat, subsystem) {
            return Some(value);
        }
        let view: MiscBonusView = self.engine.cache().typed(subsystem)?;
        Some(view.misc_bonuses.get(&stat).copied().unwrap_or(0))
    }

    pub fn is_pending(&self, stat: MiscStat) -> bool {
        self.engine.is_pending(stat)
    }

    pub async fn set_misc_bonus(
        &self,
        stat: MiscStat,
        requested: i32,
    ) -> Result<EditOutcome, EditError> {
        let character = require_character(self.engine.cache())?;
        let value = clamp_misc_bonus(requested);

        let attributes = self.api.attributes();
        let settled = self
            .engine
            .run(stat, value, async move {
                attributes.set_misc_bonus(&character, stat, value).await
            })
            .await?;

        let Settled::Latest { response, epoch } = settled else {
            return Ok(EditOutcome::Superseded);
        };
        let cache = self.engine.cache();
        if let Some(combat) = response.combat {
            cache.update_data_if_current(epoch, SubsystemName::Combat, combat);
        }
        if let Some(saves) = response.saves {
            cache.update_data_if_current(epoch, SubsystemName::Saves, saves);
        }
        Ok(EditOutcome::Applied { value })
    }

    /// String entry point (`"ac"`, `"will"`, ...); unknown names fail before any request.
    pub async fn set_misc_bonus_named(
        &self,
        stat: &str,
        requested: i32,
    ) -> Result<EditOutcome, EditError> {
        let stat: MiscStat = stat.parse()?;
        self.set_misc_bonus(stat, requested).await
    }

    pub fn dispose(&self) {
        self.engine.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{BackendResponse, HttpMethod};
    use crate::testing::ScriptedTransport;
    use saveforge_domain::CharacterId;
    use saveforge_shared::paths;
    use serde_json::json;

    fn setup() -> (Arc<ScriptedTransport>, SubsystemCache, AttributeEditor) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = Api::new(transport.clone());
        let cache = SubsystemCache::new(Arc::new(api.clone()), Arc::new(SystemClock::new()));
        cache.bind_character(CharacterId::new("pc"));
        cache.update_data(
            SubsystemName::Combat,
            json!({"armor_class": 18, "misc_bonuses": {"armor_class": 1}}),
        );
        cache.update_data(SubsystemName::Saves, json!({"fortitude": 6}));
        let editor = AttributeEditor::new(api, cache.clone());
        (transport, cache, editor)
    }

    #[test]
    fn missing_bonus_reads_as_zero_once_loaded() {
        let (_transport, _cache, editor) = setup();
        assert_eq!(editor.misc_bonus(MiscStat::ArmorClass), Some(1));
        assert_eq!(editor.misc_bonus(MiscStat::Initiative), Some(0));
        assert_eq!(editor.misc_bonus(MiscStat::Will), Some(0));
    }

    #[tokio::test]
    async fn save_bonus_goes_to_saves_endpoint_and_applies_payload() {
        let (transport, cache, editor) = setup();
        let path = paths::saves_misc_bonus(&CharacterId::new("pc"));
        transport.respond(
            HttpMethod::Post,
            &path,
            BackendResponse::ok(json!({
                "success": true,
                "saves": {"will": 9, "misc_bonuses": {"will": 75}}
            })),
        );

        let outcome = editor.set_misc_bonus(MiscStat::Will, 75).await.expect("edit");

        assert_eq!(outcome, EditOutcome::Applied { value: 50 });
        assert_eq!(transport.calls(HttpMethod::Post, &path), 1);
        assert_eq!(
            cache.data(SubsystemName::Saves),
            Some(json!({"will": 9, "misc_bonuses": {"will": 75}}))
        );
        // The override keeps the clamped value on screen.
        assert_eq!(editor.misc_bonus(MiscStat::Will), Some(50));
    }

    #[tokio::test]
    async fn unknown_stat_name_is_rejected_synchronously() {
        let (transport, _cache, editor) = setup();
        let err = editor
            .set_misc_bonus_named("charisma", 2)
            .await
            .expect_err("unknown stat");
        assert!(matches!(err, EditError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn failure_restores_confirmed_bonus() {
        let (transport, _cache, editor) = setup();
        let path = paths::combat_misc_bonus(&CharacterId::new("pc"));
        transport.respond(
            HttpMethod::Post,
            &path,
            BackendResponse::new(422, json!({"detail": "AC bonus locked"})),
        );

        let err = editor
            .set_misc_bonus_named("ac", 4)
            .await
            .expect_err("rejected");

        assert_eq!(err.user_message(), "AC bonus locked");
        assert_eq!(editor.misc_bonus(MiscStat::ArmorClass), Some(1));
        assert!(!editor.is_pending(MiscStat::ArmorClass));
    }
}
