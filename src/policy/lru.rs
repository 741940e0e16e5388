//! Least Recently Used store.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                       LruStore<K, V>                          │
//!   │                                                               │
//!   │   index: FxHashMap<K, SlotId>                                 │
//!   │   ┌─────────┬──────────┐                                      │
//!   │   │   Key   │  SlotId  │                                      │
//!   │   ├─────────┼──────────┤                                      │
//!   │   │  k_1    │   id_1   │──┐                                   │
//!   │   │  k_2    │   id_2   │──┼─┐                                 │
//!   │   │  k_3    │   id_3   │──┼─┼─┐                               │
//!   │   └─────────┴──────────┘  │ │ │                               │
//!   │                           ▼ ▼ ▼                               │
//!   │   list: IntrusiveList<Entry<K, V>>                            │
//!   │   front ──► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── back           │
//!   │            (newest)                (oldest, evict first)      │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries live in the list's arena; the index maps keys to stable
//! `SlotId`s. Every operation is a hash lookup plus a constant number of
//! link reassignments:
//!
//! | Operation         | Time | Notes                                |
//! |-------------------|------|--------------------------------------|
//! | `add_fresh`       | O(1) | push at the front                    |
//! | `replace_value`   | O(1) | slot swap, position untouched        |
//! | `remove`          | O(1) | splice out, relink neighbors         |
//! | `promote`         | O(1) | detach + reattach at the front       |
//! | `evict_oldest`    | O(1) | pop the back entry                   |
//! | `lookup`          | O(1) | no reordering                        |
//!
//! Not thread-safe; the façade guarantees single-threaded access.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
use crate::soft::SoftValue;
use crate::traits::EvictionStore;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: SoftValue<V>,
}

/// Recency-ordered store: hash index plus an arena-backed linked list.
///
/// The front of the list is the most recently touched entry, the back the
/// least recently touched one. Promotion is detach-then-reattach, never a
/// scan.
#[derive(Debug)]
pub struct LruStore<K, V> {
    list: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
}

impl<K, V> LruStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty store with reserved capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of live mappings.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no mapping is present.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if a mapping for `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` if present and still live. Does not
    /// touch the recency order.
    pub fn lookup(&self, key: &K) -> Option<Arc<V>> {
        let id = *self.index.get(key)?;
        self.list.get(id).and_then(|entry| entry.value.get())
    }

    /// Creates a fresh mapping at the newest position.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already present.
    pub fn add_fresh(&mut self, key: K, value: &Arc<V>) {
        assert!(
            !self.index.contains_key(&key),
            "attempted to add a key that is already present"
        );
        let id = self.list.push_front(Entry {
            key: key.clone(),
            value: SoftValue::new(value),
        });
        self.index.insert(key, id);
    }

    /// Swaps the value slot of an existing mapping without moving it.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn replace_value(&mut self, key: &K, value: &Arc<V>) {
        let id = *self
            .index
            .get(key)
            .expect("attempted to replace the value of an absent key");
        let entry = self.list.get_mut(id).expect("indexed entry missing");
        entry.value = SoftValue::new(value);
    }

    /// Removes the mapping for `key`, splicing its entry out of the list.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn remove(&mut self, key: &K) {
        let id = self
            .index
            .remove(key)
            .expect("attempted to remove an absent key");
        self.list.remove(id).expect("indexed entry missing");
    }

    /// Moves the entry for `key` to the newest position. A no-op when the
    /// entry is already the newest.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn promote(&mut self, key: &K) {
        let id = *self
            .index
            .get(key)
            .expect("attempted to promote an absent key");
        let moved = self.list.move_to_front(id);
        assert!(moved, "indexed entry missing");
    }

    /// Removes the least recently touched entry and returns its key.
    ///
    /// # Panics
    ///
    /// Panics if the store is empty.
    pub fn evict_oldest(&mut self) -> K {
        let entry = self
            .list
            .pop_back()
            .expect("attempted to evict from an empty store");
        self.index.remove(&entry.key);
        entry.key
    }

    /// Returns the keys from newest to oldest. Intended for inspection.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Verifies the index/list consistency invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index and list sizes do not match ({} != {})",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.is_empty() {
            if self.list.front_id().is_some() || self.list.back_id().is_some() {
                return Err(InvariantError::new("empty store has a terminal entry"));
            }
            return Ok(());
        }
        if self.list.front_id().is_none() || self.list.back_id().is_none() {
            return Err(InvariantError::new("non-empty store lacks a terminal entry"));
        }
        let mut walked = 0usize;
        for id in self.list.iter_ids() {
            let entry = self
                .list
                .get(id)
                .ok_or_else(|| InvariantError::new("list yields a vacated slot"))?;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(
                    "entry key is not indexed at its own slot",
                ));
            }
            walked += 1;
            if walked > self.index.len() {
                return Err(InvariantError::new("recency list is longer than the index"));
            }
        }
        if walked != self.index.len() {
            return Err(InvariantError::new("recency list is shorter than the index"));
        }
        Ok(())
    }
}

impl<K, V> EvictionStore<K, V> for LruStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn len(&self) -> usize {
        LruStore::len(self)
    }

    fn add_fresh(&mut self, key: K, value: &Arc<V>) {
        LruStore::add_fresh(self, key, value);
    }

    fn replace_value(&mut self, key: &K, value: &Arc<V>) {
        LruStore::replace_value(self, key, value);
    }

    fn remove(&mut self, key: &K) {
        LruStore::remove(self, key);
    }

    fn promote(&mut self, key: &K) {
        LruStore::promote(self, key);
    }

    fn evict(&mut self) -> K {
        self.evict_oldest()
    }

    fn contains(&self, key: &K) -> bool {
        LruStore::contains(self, key)
    }

    fn lookup(&self, key: &K) -> Option<Arc<V>> {
        LruStore::lookup(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with<K: Eq + Hash + Clone, V>(
        pairs: Vec<(K, Arc<V>)>,
    ) -> (LruStore<K, V>, Vec<Arc<V>>) {
        let mut store = LruStore::new(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            store.add_fresh(key, &value);
            values.push(value);
        }
        (store, values)
    }

    #[test]
    fn add_fresh_inserts_at_newest_position() {
        let (store, _values) = store_with(vec![
            (1, Arc::new("a")),
            (2, Arc::new("b")),
            (3, Arc::new("c")),
        ]);
        let order: Vec<_> = store.keys_by_recency().copied().collect();
        assert_eq!(order, vec![3, 2, 1]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn promote_moves_entry_to_front() {
        let (mut store, _values) = store_with(vec![
            (1, Arc::new("a")),
            (2, Arc::new("b")),
            (3, Arc::new("c")),
        ]);
        store.promote(&1);
        let order: Vec<_> = store.keys_by_recency().copied().collect();
        assert_eq!(order, vec![1, 3, 2]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn promote_sole_entry_is_noop() {
        let (mut store, _values) = store_with(vec![(42, Arc::new("x"))]);
        store.promote(&42);
        assert_eq!(store.len(), 1);
        let order: Vec<_> = store.keys_by_recency().copied().collect();
        assert_eq!(order, vec![42]);
    }

    #[test]
    fn evict_oldest_returns_least_recent_key() {
        let (mut store, _values) = store_with(vec![
            (1, Arc::new("a")),
            (2, Arc::new("b")),
            (3, Arc::new("c")),
        ]);
        store.promote(&1);
        assert_eq!(store.evict_oldest(), 2);
        assert_eq!(store.evict_oldest(), 3);
        assert_eq!(store.evict_oldest(), 1);
        assert!(store.is_empty());
        store.check_invariants().unwrap();
    }

    #[test]
    fn replace_value_keeps_position() {
        let (mut store, _values) = store_with(vec![(1, Arc::new("a")), (2, Arc::new("b"))]);
        let replacement = Arc::new("a2");
        store.replace_value(&1, &replacement);
        assert_eq!(store.lookup(&1).as_deref(), Some(&"a2"));
        // Key 1 is still the oldest and gets evicted first.
        assert_eq!(store.evict_oldest(), 1);
    }

    #[test]
    fn remove_middle_entry_relinks_list() {
        let (mut store, _values) = store_with(vec![
            (1, Arc::new("a")),
            (2, Arc::new("b")),
            (3, Arc::new("c")),
        ]);
        store.remove(&2);
        assert_eq!(store.len(), 2);
        assert!(!store.contains(&2));
        let order: Vec<_> = store.keys_by_recency().copied().collect();
        assert_eq!(order, vec![3, 1]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn lookup_reports_reclaimed_value_as_absent() {
        let mut store: LruStore<u32, String> = LruStore::new(2);
        let value = Arc::new("gone".to_string());
        store.add_fresh(7, &value);
        drop(value);
        assert!(store.contains(&7));
        assert_eq!(store.lookup(&7), None);
    }

    #[test]
    fn option_keys_need_no_special_casing() {
        let mut store: LruStore<Option<u32>, &str> = LruStore::new(2);
        let some = Arc::new("some");
        let none = Arc::new("none");
        store.add_fresh(Some(1), &some);
        store.add_fresh(None, &none);
        assert_eq!(store.lookup(&None).as_deref(), Some(&"none"));
        assert_eq!(store.evict_oldest(), Some(1));
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn add_fresh_existing_key_panics() {
        let (mut store, _values) = store_with(vec![(1, Arc::new("a"))]);
        let dup = Arc::new("dup");
        store.add_fresh(1, &dup);
    }

    #[test]
    #[should_panic(expected = "absent key")]
    fn replace_value_absent_key_panics() {
        let mut store: LruStore<u32, &str> = LruStore::new(2);
        let value = Arc::new("x");
        store.replace_value(&1, &value);
    }

    #[test]
    #[should_panic(expected = "promote an absent key")]
    fn promote_absent_key_panics() {
        let mut store: LruStore<u32, &str> = LruStore::new(2);
        store.promote(&1);
    }

    #[test]
    #[should_panic(expected = "evict from an empty store")]
    fn evict_empty_store_panics() {
        let mut store: LruStore<u32, &str> = LruStore::new(2);
        store.evict_oldest();
    }

    #[test]
    #[should_panic(expected = "remove an absent key")]
    fn remove_absent_key_panics() {
        let mut store: LruStore<u32, &str> = LruStore::new(2);
        store.remove(&1);
    }
}
