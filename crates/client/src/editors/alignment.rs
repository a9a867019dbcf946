//! Law/chaos and good/evil sliders.

use serde_json::{json, Value};

use saveforge_domain::{clamp_alignment, Alignment, AlignmentAxis, DomainError, SubsystemName};

use super::{require_character, EditError, EditOutcome, Optimistic, Settled};
use crate::api::Api;
use crate::notifications::Toasts;
use crate::state::SubsystemCache;

#[derive(Clone)]
pub struct AlignmentEditor {
    api: Api,
    engine: Optimistic<AlignmentAxis>,
}

impl AlignmentEditor {
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

    fn confirmed(&self) -> Option<Alignment> {
        self.engine.cache().typed(SubsystemName::Alignment)
    }

    /// Both axes with pending edits applied.
    pub fn alignment(&self) -> Option<Alignment> {
        let confirmed = self.confirmed()?;
        Some(
            [AlignmentAxis::LawChaos, AlignmentAxis::GoodEvil]
                .into_iter()
                .fold(confirmed, |alignment, axis| {
                    match self.engine.override_value(axis, SubsystemName::Alignment) {
                        Some(value) => alignment.with(axis, value),
                        None => alignment,
                    }
                }),
        )
    }

    pub fn value(&self, axis: AlignmentAxis) -> Option<i32> {
        self.alignment().map(|alignment| alignment.get(axis))
    }

    /// Nine-box name such as "Chaotic Good".
    pub fn name(&self) -> Option<String> {
        self.alignment().map(|alignment| alignment.name())
    }

    pub fn is_pending(&self, axis: AlignmentAxis) -> bool {
        self.engine.is_pending(axis)
    }

    /// Move one axis, clamped to `0..=100`. Only that axis is sent, so a
    /// pending edit of the other axis is never written on its behalf.
    pub async fn set_value(
        &self,
        axis: AlignmentAxis,
        requested: i32,
    ) -> Result<EditOutcome, EditError> {
        let character = require_character(self.engine.cache())?;
        if self.confirmed().is_none() {
            return Err(DomainError::validation("Alignment is not loaded").into());
        }
        let value = clamp_alignment(requested);

        let api = self.api.alignment();
        let settled = self
            .engine
            .run(axis, value, async move {
                api.update(&character, axis, value).await
            })
            .await?;

        let Settled::Latest { response, epoch } = settled else {
            return Ok(EditOutcome::Superseded);
        };
        if let Some(accepted) = response.alignment {
            self.apply_accepted(epoch, accepted);
        }
        Ok(EditOutcome::Applied { value })
    }

    fn apply_accepted(&self, epoch: u64, accepted: Alignment) {
        let cache = self.engine.cache();
        let mut data = cache
            .data(SubsystemName::Alignment)
            .unwrap_or_else(|| json!({}));
        if let Value::Object(fields) = &mut data {
            fields.insert("law_chaos".to_string(), json!(accepted.law_chaos));
            fields.insert("good_evil".to_string(), json!(accepted.good_evil));
            cache.update_data_if_current(epoch, SubsystemName::Alignment, data);
        }
    }

    pub fn dispose(&self) {
        self.engine.dispose();
    }
}
