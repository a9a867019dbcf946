//! Per-character subsystem cache.
//!
//! Holds the last server payload of each subsystem of the active character.
//! Loads are lazy and deduplicated; mutations refresh dependent subsystems
//! through [`SubsystemCache::invalidate_subsystems`].
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`; the fetch itself runs unlocked and its result is applied only if
//! it is still the most recent load for the same character.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use saveforge_domain::{CharacterId, SubsystemName};

use crate::api::SubsystemSource;
use crate::infrastructure::ports::ClockPort;

const EVENT_CAPACITY: usize = 64;

/// Snapshot of one subsystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsystemState {
    pub data: Option<Value>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl SubsystemState {
    /// Deserialize `data` into a typed view. `None` until data is present.
    pub fn typed<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.data
            .as_ref()
            .map(|data| serde_json::from_value(data.clone()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Refetch even if data is present or a load is in flight.
    pub force: bool,
}

impl LoadOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Change notifications for readers of the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum SubsystemEvent {
    Loading(SubsystemName),
    Loaded(SubsystemName),
    Failed {
        subsystem: SubsystemName,
        error: String,
    },
    Updated(SubsystemName),
    Reset,
}

/// Background reloads started by an invalidation.
///
/// Dropping it detaches the tasks; they still run to completion.
#[derive(Debug, Default)]
pub struct Refresh {
    handles: Vec<JoinHandle<SubsystemState>>,
}

impl Refresh {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn into_handles(self) -> Vec<JoinHandle<SubsystemState>> {
        self.handles
    }

    /// Wait for every reload; a panicked task is skipped.
    pub async fn wait(self) -> Vec<SubsystemState> {
        futures_util::future::join_all(self.handles)
            .await
            .into_iter()
            .filter_map(|joined| {
                joined
                    .inspect_err(|e| tracing::error!(error = %e, "Subsystem reload task failed"))
                    .ok()
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct Entry {
    state: SubsystemState,
    load_seq: u64,
    /// Revision of the load that last populated `data`.
    refreshed_revision: u64,
}

#[derive(Debug, Default)]
struct Inner {
    character: Option<CharacterId>,
    epoch: u64,
    revision: u64,
    reset_revision: u64,
    entries: HashMap<SubsystemName, Entry>,
}

/// Cheaply cloneable handle over one cache instance.
#[derive(Clone)]
pub struct SubsystemCache {
    inner: Arc<Mutex<Inner>>,
    source: Arc<dyn SubsystemSource>,
    clock: Arc<dyn ClockPort>,
    events: broadcast::Sender<SubsystemEvent>,
}

impl SubsystemCache {
    pub fn new(source: Arc<dyn SubsystemSource>, clock: Arc<dyn ClockPort>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            source,
            clock,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SubsystemEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubsystemEvent> {
        self.events.subscribe()
    }

    pub fn character(&self) -> Option<CharacterId> {
        self.lock().character.clone()
    }

    /// Incremented on every character change or reset.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Incremented whenever a load is issued and on reset.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Revision of the load that last populated `subsystem`.
    pub fn refreshed_revision(&self, subsystem: SubsystemName) -> u64 {
        let inner = self.lock();
        let loaded = inner
            .entries
            .get(&subsystem)
            .map_or(0, |entry| entry.refreshed_revision);
        loaded.max(inner.reset_revision)
    }

    /// Drop every subsystem and bind the cache to `character`.
    pub fn bind_character(&self, character: CharacterId) {
        {
            let mut inner = self.lock();
            clear(&mut inner);
            tracing::info!(character = %character, epoch = inner.epoch, "Subsystem cache bound to character");
            inner.character = Some(character);
        }
        self.emit(SubsystemEvent::Reset);
    }

    /// Drop every subsystem and unbind the character.
    pub fn reset(&self) {
        {
            let mut inner = self.lock();
            clear(&mut inner);
            inner.character = None;
            tracing::debug!(epoch = inner.epoch, "Subsystem cache reset");
        }
        self.emit(SubsystemEvent::Reset);
    }

    pub fn state(&self, subsystem: SubsystemName) -> SubsystemState {
        self.lock()
            .entries
            .get(&subsystem)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn data(&self, subsystem: SubsystemName) -> Option<Value> {
        self.lock()
            .entries
            .get(&subsystem)
            .and_then(|entry| entry.state.data.clone())
    }

    /// Typed view of `subsystem`'s data; `None` if absent or of another shape.
    pub fn typed<T: DeserializeOwned>(&self, subsystem: SubsystemName) -> Option<T> {
        let data = self.data(subsystem)?;
        serde_json::from_value(data)
            .inspect_err(|e| {
                tracing::warn!(subsystem = subsystem.as_str(), error = %e, "Subsystem data has unexpected shape");
            })
            .ok()
    }

    /// Load `subsystem`, fetching only if needed.
    ///
    /// Without `force`, present data or an in-flight load is returned as is.
    /// Failures are recorded in the state's `error`; earlier data is kept.
    pub async fn load(&self, subsystem: SubsystemName, options: LoadOptions) -> SubsystemState {
        let (character, epoch, seq, issued) = {
            let mut inner = self.lock();
            let Some(character) = inner.character.clone() else {
                let entry = inner.entries.entry(subsystem).or_default();
                entry.state.error = Some("No character loaded".to_string());
                return entry.state.clone();
            };
            let entry = inner.entries.entry(subsystem).or_default();
            if !options.force && (entry.state.data.is_some() || entry.state.is_loading) {
                return entry.state.clone();
            }
            entry.load_seq += 1;
            entry.state.is_loading = true;
            let seq = entry.load_seq;

            inner.revision += 1;
            (character, inner.epoch, seq, inner.revision)
        };

        tracing::debug!(subsystem = subsystem.as_str(), character = %character, force = options.force, "Loading subsystem");
        self.emit(SubsystemEvent::Loading(subsystem));

        let result = self.source.fetch_subsystem(&character, subsystem).await;
        let now = self.clock.now();

        let (state, event) = {
            let mut inner = self.lock();
            if inner.epoch != epoch {
                tracing::debug!(subsystem = subsystem.as_str(), "Discarding load for a previous character");
                return SubsystemState::default();
            }
            let entry = inner.entries.entry(subsystem).or_default();
            if entry.load_seq != seq {
                tracing::debug!(subsystem = subsystem.as_str(), seq, "Discarding superseded load");
                return entry.state.clone();
            }

            entry.state.is_loading = false;
            let event = match result {
                Ok(data) => {
                    entry.state.data = Some(data);
                    entry.state.error = None;
                    entry.state.last_fetched_at = Some(now);
                    entry.refreshed_revision = issued;
                    SubsystemEvent::Loaded(subsystem)
                }
                Err(e) => {
                    tracing::warn!(subsystem = subsystem.as_str(), error = %e, "Subsystem load failed");
                    let message = e.user_message();
                    entry.state.error = Some(message.clone());
                    SubsystemEvent::Failed {
                        subsystem,
                        error: message,
                    }
                }
            };
            (entry.state.clone(), event)
        };

        self.emit(event);
        state
    }

    /// Force a background reload of each named subsystem.
    ///
    /// Requires a tokio runtime. The returned [`Refresh`] may be awaited or dropped.
    pub fn invalidate_subsystems(&self, subsystems: &[SubsystemName]) -> Refresh {
        tracing::debug!(?subsystems, "Invalidating subsystems");
        let handles = subsystems
            .iter()
            .copied()
            .map(|subsystem| {
                let cache = self.clone();
                tokio::spawn(async move { cache.load(subsystem, LoadOptions::forced()).await })
            })
            .collect();
        Refresh { handles }
    }

    /// Replace `subsystem`'s data with a payload returned by a mutation.
    ///
    /// Supersedes any in-flight load of the same subsystem.
    pub fn update_data(&self, subsystem: SubsystemName, data: Value) {
        let now = self.clock.now();
        {
            let mut inner = self.lock();
            let entry = inner.entries.entry(subsystem).or_default();
            entry.load_seq += 1;
            entry.state.data = Some(data);
            entry.state.is_loading = false;
            entry.state.error = None;
            entry.state.last_fetched_at = Some(now);
        }
        self.emit(SubsystemEvent::Updated(subsystem));
    }

    /// [`update_data`](Self::update_data) unless the character changed since `epoch`.
    pub fn update_data_if_current(&self, epoch: u64, subsystem: SubsystemName, data: Value) -> bool {
        if self.epoch() != epoch {
            tracing::debug!(subsystem = subsystem.as_str(), "Dropping update for a previous character");
            return false;
        }
        self.update_data(subsystem, data);
        true
    }
}

fn clear(inner: &mut Inner) {
    inner.entries.clear();
    inner.epoch += 1;
    inner.revision += 1;
    inner.reset_revision = inner.revision;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::subsystems::MockSubsystemSource;
    use crate::api::ApiError;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::TransportError;
    use chrono::TimeZone;
    use serde_json::json;

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid time"),
        ))
    }

    fn cache_with(source: MockSubsystemSource) -> SubsystemCache {
        let cache = SubsystemCache::new(Arc::new(source), clock());
        cache.bind_character(CharacterId::new("pc-1"));
        cache
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let mut source = MockSubsystemSource::new();
        source
            .expect_fetch_subsystem()
            .times(1)
            .returning(|_, _| Ok(json!({"armor_class": 18})));
        let cache = cache_with(source);

        let first = cache.load(SubsystemName::Combat, LoadOptions::default()).await;
        let second = cache.load(SubsystemName::Combat, LoadOptions::default()).await;

        assert_eq!(first.data, Some(json!({"armor_class": 18})));
        assert_eq!(first, second);
        assert!(!second.is_loading);
        assert!(second.last_fetched_at.is_some());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_data() {
        let mut source = MockSubsystemSource::new();
        let mut calls = 0;
        source.expect_fetch_subsystem().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(json!({"fortitude": 5}))
            } else {
                Err(ApiError::Transport(TransportError::connection("refused")))
            }
        });
        let cache = cache_with(source);

        cache.load(SubsystemName::Saves, LoadOptions::default()).await;
        let state = cache.load(SubsystemName::Saves, LoadOptions::forced()).await;

        assert_eq!(state.data, Some(json!({"fortitude": 5})));
        assert_eq!(state.error.as_deref(), Some("Could not reach the editor backend"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn load_without_character_records_error() {
        let source = MockSubsystemSource::new();
        let cache = SubsystemCache::new(Arc::new(source), clock());

        let state = cache.load(SubsystemName::Skills, LoadOptions::default()).await;
        assert!(state.data.is_none());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn update_data_marks_fresh_and_notifies() {
        let source = MockSubsystemSource::new();
        let cache = cache_with(source);
        let mut events = cache.subscribe();

        cache.update_data(SubsystemName::Feats, json!({"feats": []}));

        let state = cache.state(SubsystemName::Feats);
        assert_eq!(state.data, Some(json!({"feats": []})));
        assert!(!state.is_loading);
        assert!(state.last_fetched_at.is_some());
        assert_eq!(
            events.recv().await.expect("event"),
            SubsystemEvent::Updated(SubsystemName::Feats)
        );
    }

    #[tokio::test]
    async fn reset_bumps_epoch_and_drops_data() {
        let mut source = MockSubsystemSource::new();
        source
            .expect_fetch_subsystem()
            .returning(|_, _| Ok(json!({"law_chaos": 50, "good_evil": 50})));
        let cache = cache_with(source);
        cache.load(SubsystemName::Alignment, LoadOptions::default()).await;
        let epoch = cache.epoch();

        cache.reset();

        assert!(cache.epoch() > epoch);
        assert_eq!(cache.character(), None);
        assert_eq!(cache.state(SubsystemName::Alignment), SubsystemState::default());
        assert!(!cache.update_data_if_current(epoch, SubsystemName::Alignment, json!({})));
    }

    #[tokio::test]
    async fn refreshed_revision_tracks_issue_order() {
        let mut source = MockSubsystemSource::new();
        source
            .expect_fetch_subsystem()
            .returning(|_, _| Ok(json!({})));
        let cache = cache_with(source);

        let before = cache.revision();
        cache.load(SubsystemName::Skills, LoadOptions::default()).await;
        assert!(cache.refreshed_revision(SubsystemName::Skills) > before);
        assert_eq!(
            cache.refreshed_revision(SubsystemName::Combat),
            before,
            "never-loaded subsystems report the reset revision"
        );
    }
}
