//! Local overrides for optimistically edited fields.
//!
//! An override holds a value the user edited but the backend has not yet
//! echoed back through a fresh subsystem load. Each key carries its own
//! sequence number so a response to a superseded edit can be recognised and
//! discarded: last *issued* edit wins, regardless of network completion order.
//!
//! An override is pending until its request succeeds. Pending overrides are
//! never retired; confirmed ones are retired once a load issued after the
//! confirmation has completed.

use std::collections::HashMap;
use std::hash::Hash;

/// Identifies one optimistic write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideTicket<K> {
    pub key: K,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: i32,
    seq: u64,
    /// Cache revision at confirmation, `None` while the request is in flight.
    confirmed_at: Option<u64>,
}

impl Slot {
    fn is_stale(&self, refreshed_revision: u64) -> bool {
        self.confirmed_at
            .is_some_and(|confirmed| confirmed < refreshed_revision)
    }
}

#[derive(Debug)]
pub struct OverrideMap<K> {
    slots: HashMap<K, Slot>,
    next_seq: u64,
}

impl<K> Default for OverrideMap<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K> OverrideMap<K>
where
    K: Eq + Hash + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending `value` for `key`, replacing any earlier value.
    pub fn apply(&mut self, key: K, value: i32) -> OverrideTicket<K> {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.slots.insert(
            key,
            Slot {
                value,
                seq,
                confirmed_at: None,
            },
        );
        OverrideTicket { key, seq }
    }

    /// Mark the write as accepted by the backend at cache `revision`.
    ///
    /// Returns false if a newer write replaced it.
    pub fn confirm(&mut self, ticket: OverrideTicket<K>, revision: u64) -> bool {
        match self.slots.get_mut(&ticket.key) {
            Some(slot) if slot.seq == ticket.seq => {
                slot.confirmed_at = Some(revision);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.slots
            .get(&key)
            .is_some_and(|slot| slot.confirmed_at.is_none())
    }

    pub fn get(&self, key: K) -> Option<i32> {
        self.slots.get(&key).map(|s| s.value)
    }

    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    /// Whether `ticket` is still the newest write for its key.
    pub fn is_latest(&self, ticket: OverrideTicket<K>) -> bool {
        self.slots
            .get(&ticket.key)
            .is_some_and(|slot| slot.seq == ticket.seq)
    }

    /// Remove the override written by `ticket`, unless a newer write replaced it.
    ///
    /// Returns whether anything was removed. Other keys are never touched.
    pub fn rollback(&mut self, ticket: OverrideTicket<K>) -> bool {
        if self.is_latest(ticket) {
            self.slots.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    /// Drop the override for `key` if it was confirmed before `refreshed_revision`.
    pub fn retire_if_stale(&mut self, key: K, refreshed_revision: u64) -> bool {
        let stale = self
            .slots
            .get(&key)
            .is_some_and(|slot| slot.is_stale(refreshed_revision));
        if stale {
            self.slots.remove(&key);
        }
        stale
    }

    /// Drop every override confirmed before `revision`.
    pub fn retire_before(&mut self, revision: u64) -> usize {
        self.retire_stale(|_| revision)
    }

    /// Drop every override older than the revision `refreshed_revision(key)` reports.
    pub fn retire_stale<F>(&mut self, refreshed_revision: F) -> usize
    where
        F: Fn(K) -> u64,
    {
        let before = self.slots.len();
        self.slots
            .retain(|key, slot| !slot.is_stale(refreshed_revision(*key)));
        before - self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_removes_only_its_key() {
        let mut map = OverrideMap::new();
        let str_ticket = map.apply("Str", 16);
        map.apply("Dex", 12);

        assert!(map.rollback(str_ticket));
        assert_eq!(map.get("Str"), None);
        assert_eq!(map.get("Dex"), Some(12));
    }

    #[test]
    fn superseded_ticket_does_not_roll_back_newer_value() {
        let mut map = OverrideMap::new();
        let first = map.apply("Str", 16);
        let second = map.apply("Str", 18);

        assert!(!map.is_latest(first));
        assert!(map.is_latest(second));
        assert!(!map.rollback(first));
        assert!(!map.confirm(first, 1));
        assert_eq!(map.get("Str"), Some(18));
    }

    #[test]
    fn pending_overrides_are_never_retired() {
        let mut map = OverrideMap::new();
        map.apply("Str", 16);
        assert!(map.is_pending("Str"));
        assert!(!map.retire_if_stale("Str", 100));
        assert_eq!(map.get("Str"), Some(16));
    }

    #[test]
    fn retire_drops_overrides_confirmed_before_refresh() {
        let mut map = OverrideMap::new();
        let str_ticket = map.apply("Str", 16);
        let dex_ticket = map.apply("Dex", 12);
        map.confirm(str_ticket, 3);
        map.confirm(dex_ticket, 5);

        assert!(map.retire_if_stale("Str", 4));
        assert!(!map.retire_if_stale("Dex", 4));
        assert_eq!(map.get("Str"), None);
        assert_eq!(map.get("Dex"), Some(12));
    }

    #[test]
    fn retire_stale_uses_per_key_revision() {
        let mut map = OverrideMap::new();
        let ac = map.apply("ac", 2);
        let will = map.apply("will", 1);
        map.confirm(ac, 3);
        map.confirm(will, 3);

        let removed = map.retire_stale(|key| if key == "ac" { 4 } else { 1 });
        assert_eq!(removed, 1);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["will"]);
    }

    #[test]
    fn retire_before_applies_to_every_confirmed_key() {
        let mut map = OverrideMap::new();
        let str_ticket = map.apply("Str", 16);
        let dex_ticket = map.apply("Dex", 12);
        map.apply("Con", 14);
        map.confirm(str_ticket, 2);
        map.confirm(dex_ticket, 7);

        assert_eq!(map.retire_before(5), 1);
        assert!(map.contains("Dex"));
        assert!(map.contains("Con"));
    }

    #[test]
    fn sequence_numbers_are_monotonic_across_keys() {
        let mut map = OverrideMap::new();
        let a = map.apply("a", 1);
        let b = map.apply("b", 1);
        assert!(b.seq > a.seq);
        map.clear();
        assert!(map.is_empty());
    }
}
