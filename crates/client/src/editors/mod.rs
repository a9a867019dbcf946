//! Optimistic editors.
//!
//! Each editor shows the user's value immediately through a local override,
//! sends the mutation, and then either keeps the override (success) or
//! removes it (failure). The shared steps live in [`Optimistic`]:
//!
//! 1. validate and clamp synchronously (done by the editor)
//! 2. write the override and take a ticket
//! 3. send the request
//! 4. on success keep the override until a later fresh load retires it
//! 5. on failure remove the override, unless a newer edit replaced it
//!
//! Responses to superseded edits are discarded. Once an editor is disposed
//! nothing it started writes to shared state.

pub mod abilities;
pub mod alignment;
pub mod attributes;
pub mod feats;
pub mod inventory;
pub mod skills;

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

use saveforge_domain::{DomainError, SubsystemName};

use crate::api::ApiError;
use crate::notifications::Toasts;
use crate::state::{OverrideMap, SubsystemCache};

pub use abilities::AbilityScoreEditor;
pub use alignment::AlignmentEditor;
pub use attributes::AttributeEditor;
pub use feats::{FeatChange, FeatManager};
pub use inventory::{InventoryChange, InventoryManager};
pub use skills::SkillEditor;

/// Why an edit did not take effect.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    /// Rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("No character is loaded")]
    NoCharacter,

    /// The backend call failed; the optimistic value was rolled back.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A different character was loaded while the request was in flight.
    #[error("The character changed before the edit completed")]
    CharacterChanged,

    #[error("The editor was disposed before the edit completed")]
    Disposed,
}

impl EditError {
    /// Whether the error is a synchronous validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NoCharacter)
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// How a completed edit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The backend accepted `value`; it stays displayed.
    Applied { value: i32 },
    /// A newer edit of the same field was issued; this response was ignored.
    Superseded,
}

/// A response that is still the newest for its key.
pub(crate) enum Settled<T> {
    Latest { response: T, epoch: u64 },
    Superseded,
}

struct Overrides<K> {
    epoch: u64,
    map: OverrideMap<K>,
}

/// Shared optimistic-update engine for one editor instance.
pub struct Optimistic<K> {
    cache: SubsystemCache,
    overrides: Arc<Mutex<Overrides<K>>>,
    cancel: CancellationToken,
    toasts: Option<Toasts>,
}

impl<K> Clone for Optimistic<K> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            overrides: self.overrides.clone(),
            cancel: self.cancel.clone(),
            toasts: self.toasts.clone(),
        }
    }
}

impl<K> Optimistic<K>
where
    K: Copy + Eq + Hash + Debug + Send + 'static,
{
    pub fn new(cache: SubsystemCache) -> Self {
        Self::with_cancellation(cache, CancellationToken::new())
    }

    pub fn with_cancellation(cache: SubsystemCache, cancel: CancellationToken) -> Self {
        let epoch = cache.epoch();
        Self {
            cache,
            overrides: Arc::new(Mutex::new(Overrides {
                epoch,
                map: OverrideMap::new(),
            })),
            cancel,
            toasts: None,
        }
    }

    /// Raise an error toast whenever an edit is rolled back.
    pub fn with_notifications(mut self, toasts: Toasts) -> Self {
        self.toasts = Some(toasts);
        self
    }

    pub fn cache(&self) -> &SubsystemCache {
        &self.cache
    }

    /// Overrides for the current character; cleared when the character changes.
    fn overrides(&self) -> MutexGuard<'_, Overrides<K>> {
        let mut guard = self
            .overrides
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let epoch = self.cache.epoch();
        if guard.epoch != epoch {
            guard.map.clear();
            guard.epoch = epoch;
        }
        guard
    }

    /// The overridden value for `key`, once stale overrides are retired.
    pub fn override_value(&self, key: K, subsystem: SubsystemName) -> Option<i32> {
        let refreshed = self.cache.refreshed_revision(subsystem);
        let mut overrides = self.overrides();
        if overrides.map.retire_if_stale(key, refreshed) {
            tracing::trace!(?key, "Override retired by fresh load");
        }
        overrides.map.get(key)
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.overrides().map.is_pending(key)
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run steps 2 to 5 for an already validated `value`.
    pub(crate) async fn run<T, F>(
        &self,
        key: K,
        value: i32,
        request: F,
    ) -> Result<Settled<T>, EditError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_disposed() {
            return Err(EditError::Disposed);
        }
        let epoch = self.cache.epoch();
        let ticket = self.overrides().map.apply(key, value);
        tracing::debug!(?key, value, seq = ticket.seq, "Optimistic edit applied");

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(EditError::Disposed),
            result = request => result,
        };

        if self.is_disposed() {
            return Err(EditError::Disposed);
        }
        if self.cache.epoch() != epoch {
            return Err(EditError::CharacterChanged);
        }

        let mut overrides = self.overrides();
        match result {
            Ok(response) => {
                if overrides.map.confirm(ticket, self.cache.revision()) {
                    Ok(Settled::Latest { response, epoch })
                } else {
                    tracing::debug!(?key, seq = ticket.seq, "Discarding response to superseded edit");
                    Ok(Settled::Superseded)
                }
            }
            Err(e) => {
                if overrides.map.rollback(ticket) {
                    tracing::warn!(?key, value, error = %e, "Edit failed, rolled back");
                    let err = EditError::Api(e);
                    if let Some(toasts) = &self.toasts {
                        toasts.mutation_failed(&err);
                    }
                    Err(err)
                } else {
                    tracing::debug!(?key, seq = ticket.seq, error = %e, "Superseded edit failed");
                    Ok(Settled::Superseded)
                }
            }
        }
    }
}

/// Shorthand for editors that need the bound character before validating.
pub(crate) fn require_character(
    cache: &SubsystemCache,
) -> Result<saveforge_domain::CharacterId, EditError> {
    cache.character().ok_or(EditError::NoCharacter)
}
