//! Memoized feat eligibility checks.
//!
//! Entries are dropped when feats change or the character changes; there is
//! no time-based expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use saveforge_shared::FeatValidationResponse;

/// Whether the active character may take a feat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatEligibility {
    pub can_take: bool,
    pub missing_requirements: Vec<String>,
}

impl From<FeatValidationResponse> for FeatEligibility {
    fn from(response: FeatValidationResponse) -> Self {
        Self {
            can_take: response.can_take,
            missing_requirements: response.missing_requirements,
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    epoch: u64,
    /// Bumped on every invalidation; results of checks started before it are dropped.
    generation: u64,
    by_feat: HashMap<u32, FeatEligibility>,
}

impl Entries {
    /// Move forward to `epoch` if it is newer. False for an older epoch.
    fn advance(&mut self, epoch: u64) -> bool {
        if epoch > self.epoch {
            self.by_feat.clear();
            self.epoch = epoch;
            self.generation += 1;
        }
        epoch == self.epoch
    }
}

#[derive(Debug, Default)]
pub struct FeatValidationCache {
    entries: Mutex<Entries>,
}

impl FeatValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached eligibility for `feat_id`, if checked since the last invalidation.
    pub fn get(&self, epoch: u64, feat_id: u32) -> Option<FeatEligibility> {
        let mut entries = self.lock();
        if !entries.advance(epoch) {
            return None;
        }
        entries.by_feat.get(&feat_id).cloned()
    }

    /// Generation to pass back to [`insert`](Self::insert) once a check completes.
    pub fn generation(&self, epoch: u64) -> u64 {
        let mut entries = self.lock();
        entries.advance(epoch);
        entries.generation
    }

    /// Store a result unless the cache was invalidated since `generation` was taken.
    pub fn insert(
        &self,
        epoch: u64,
        generation: u64,
        feat_id: u32,
        eligibility: FeatEligibility,
    ) -> bool {
        let mut entries = self.lock();
        if !entries.advance(epoch) || entries.generation != generation {
            return false;
        }
        entries.by_feat.insert(feat_id, eligibility);
        true
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.by_feat.clear();
        entries.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.lock().by_feat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible() -> FeatEligibility {
        FeatEligibility {
            can_take: true,
            missing_requirements: vec![],
        }
    }

    #[test]
    fn hit_within_same_epoch() {
        let cache = FeatValidationCache::new();
        let generation = cache.generation(1);
        assert!(cache.insert(1, generation, 42, eligible()));
        assert_eq!(cache.get(1, 42), Some(eligible()));
        assert_eq!(cache.get(1, 7), None);
    }

    #[test]
    fn character_change_drops_entries() {
        let cache = FeatValidationCache::new();
        let generation = cache.generation(1);
        cache.insert(1, generation, 42, eligible());
        assert_eq!(cache.get(2, 42), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get(1, 42), None);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = FeatValidationCache::new();
        let generation = cache.generation(3);
        cache.insert(3, generation, 1, eligible());
        cache.insert(3, generation, 2, eligible());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.get(3, 1), None);
    }

    #[test]
    fn result_started_before_clear_is_dropped() {
        let cache = FeatValidationCache::new();
        let before = cache.generation(1);
        cache.clear();

        assert!(!cache.insert(1, before, 42, eligible()));
        assert_eq!(cache.get(1, 42), None);

        let after = cache.generation(1);
        assert!(cache.insert(1, after, 42, eligible()));
    }

    #[test]
    fn result_for_previous_character_is_dropped() {
        let cache = FeatValidationCache::new();
        let old = cache.generation(1);
        let current = cache.generation(2);
        cache.insert(2, current, 7, eligible());

        assert!(!cache.insert(1, old, 42, eligible()));
        assert_eq!(cache.get(2, 7), Some(eligible()));
    }

    #[test]
    fn converts_from_response() {
        let eligibility = FeatEligibility::from(FeatValidationResponse {
            can_take: false,
            missing_requirements: vec!["Str 13".to_string()],
        });
        assert!(!eligibility.can_take);
        assert_eq!(eligibility.missing_requirements, vec!["Str 13"]);
    }
}
