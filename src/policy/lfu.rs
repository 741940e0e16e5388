//! Least Frequently Used store with O(1) frequency buckets.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                        LfuStore<K, V>                           │
//!   │                                                                 │
//!   │   index: FxHashMap<K, SlotId>     entries: SlotArena<Entry>     │
//!   │   ┌─────────┬──────────┐          ┌──────┬───────────────────┐  │
//!   │   │   Key   │  SlotId  │          │ Slot │ freq, prev/next,  │  │
//!   │   │  k_a    │   id_0   │─────────►│ id_0 │ key, value        │  │
//!   │   │  k_b    │   id_1   │─────────►│ id_1 │ ...               │  │
//!   │   └─────────┴──────────┘          └──────┴───────────────────┘  │
//!   │                                                                 │
//!   │   buckets: FxHashMap<u64, Bucket>   (one per occupied freq)     │
//!   │                                                                 │
//!   │   min_freq = 1                              max_freq = 3        │
//!   │       │                                         │               │
//!   │       ▼                                         ▼               │
//!   │   freq=1: head ─► [id_1] ◄─► [id_2] ◄─ tail   freq=3: [id_0]    │
//!   │           (newest arrival)   (oldest, evict first)              │
//!   │                                                                 │
//!   │   bucket links: freq=1 ──next──► freq=3                         │
//!   │                 freq=3 ◄──prev── freq=1                         │
//!   └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each bucket owns an insertion-ordered entry list (head = newest arrival
//! at that frequency, tail = oldest) and links to the neighboring occupied
//! frequencies, forming an ascending sequence between the `min_freq` and
//! `max_freq` terminals. A bucket exists exactly as long as it has keys.
//!
//! ## Frequency increment
//!
//! Raising a key from frequency *f* to *f+1* splits into four cases on
//! whether the key is alone in its bucket (vacating) and whether a bucket
//! for *f+1* already exists (joining):
//!
//! ```text
//!   (vacating, joining) │ bucket sequence work
//!   ────────────────────┼──────────────────────────────────────────────
//!   (true,  true)       │ destroy f, relink its neighbors
//!   (true,  false)      │ f+1 takes over f's position and neighbors
//!   (false, true)       │ none (f and f+1 already adjacent)
//!   (false, false)      │ splice f+1 immediately above f
//! ```
//!
//! No case scans other buckets, which is what keeps every mutation O(1).
//! Eviction pops the tail of the `min_freq` bucket: the oldest arrival at
//! the minimum frequency, a deterministic tie-break.
//!
//! Not thread-safe; the façade guarantees single-threaded access.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;
use crate::soft::SoftValue;
use crate::traits::EvictionStore;

/// Link fields first: they are touched on every increment and eviction.
#[derive(Debug)]
struct Entry<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
    value: SoftValue<V>,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    /// Next lower occupied frequency.
    prev: Option<u64>,
    /// Next higher occupied frequency.
    next: Option<u64>,
}

/// Frequency-ordered store: hash index, entry arena, and one bucket per
/// occupied frequency.
///
/// `min_freq`/`max_freq` are the terminals of the bucket sequence; both are
/// 0 while the store is empty.
#[derive(Debug)]
pub struct LfuStore<K, V> {
    entries: SlotArena<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
    max_freq: u64,
}

impl<K, V> LfuStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty store with reserved capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
            max_freq: 0,
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
    /// touch any frequency.
    pub fn lookup(&self, key: &K) -> Option<Arc<V>> {
        let id = *self.index.get(key)?;
        self.entries.get(id).and_then(|entry| entry.value.get())
    }

    /// Returns the access count recorded for `key`, if present.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Returns the lowest occupied frequency, if any.
    pub fn min_frequency(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Returns the highest occupied frequency, if any.
    pub fn max_frequency(&self) -> Option<u64> {
        (self.max_freq != 0).then_some(self.max_freq)
    }

    /// Returns the keys at `freq` from newest to oldest arrival. Intended
    /// for inspection.
    pub fn keys_at_frequency(&self, freq: u64) -> KeysAtFrequency<'_, K, V> {
        KeysAtFrequency {
            store: self,
            current: self.buckets.get(&freq).and_then(|bucket| bucket.head),
        }
    }

    /// Creates a fresh mapping at frequency 1.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already present.
    pub fn add_fresh(&mut self, key: K, value: &Arc<V>) {
        assert!(
            !self.index.contains_key(&key),
            "attempted to add a key that is already present"
        );

        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key: key.clone(),
            value: SoftValue::new(value),
        });
        self.index.insert(key, id);

        if !self.buckets.contains_key(&1) {
            // Frequency 1 always becomes the new minimum.
            let next = (self.min_freq != 0).then_some(self.min_freq);
            self.insert_bucket(1, None, next);
        }
        self.list_push_front(1, id);
        self.min_freq = 1;
        if self.max_freq == 0 {
            self.max_freq = 1;
        }
    }

    /// Swaps the value slot of an existing mapping; the frequency is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn replace_value(&mut self, key: &K, value: &Arc<V>) {
        let id = *self
            .index
            .get(key)
            .expect("attempted to replace the value of an absent key");
        let entry = self.entries.get_mut(id).expect("indexed entry missing");
        entry.value = SoftValue::new(value);
    }

    /// Moves the entry for `key` from frequency *f* to *f+1*.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn increment_frequency(&mut self, key: &K) {
        let id = *self
            .index
            .get(key)
            .expect("attempted to increment an absent key");
        let freq = self.entries.get(id).expect("indexed entry missing").freq;

        if freq == u64::MAX {
            // Saturated; refresh the arrival order and leave the count.
            self.list_remove(freq, id);
            self.list_push_front(freq, id);
            return;
        }

        let bucket = self.buckets.get(&freq).expect("bucket missing");
        let vacating = bucket.head == Some(id) && bucket.tail == Some(id);
        let joining = self.buckets.contains_key(&(freq + 1));

        match (vacating, joining) {
            (true, true) => self.vacate_and_join(id, freq),
            (true, false) => self.vacate_and_create(id, freq),
            (false, true) => self.stay_and_join(id, freq),
            (false, false) => self.stay_and_create(id, freq),
        }

        self.entries.get_mut(id).expect("indexed entry missing").freq = freq + 1;
        self.list_push_front(freq + 1, id);
    }

    /// Case 1: the key was alone at *f* and a bucket for *f+1* exists.
    /// Bucket *f* dies; its neighbors are stitched together. The right
    /// neighbor is necessarily *f+1*.
    fn vacate_and_join(&mut self, id: SlotId, freq: u64) {
        self.list_remove(freq, id);
        let (prev, next) = self.bucket_links(freq);
        self.remove_bucket(freq, prev, next);
        if self.min_freq == freq {
            self.min_freq = freq + 1;
        }
    }

    /// Case 2: the key was alone at *f* and no bucket for *f+1* exists.
    /// A fresh *f+1* bucket takes over *f*'s position and both neighbors.
    fn vacate_and_create(&mut self, id: SlotId, freq: u64) {
        self.list_remove(freq, id);
        let (prev, next) = self.bucket_links(freq);
        self.buckets.remove(&freq);
        self.insert_bucket(freq + 1, prev, next);
        if self.min_freq == freq {
            self.min_freq = freq + 1;
        }
        if self.max_freq == freq {
            self.max_freq = freq + 1;
        }
    }

    /// Case 3: *f* stays occupied and *f+1* exists. The two buckets are
    /// already adjacent; only the key moves between their lists.
    fn stay_and_join(&mut self, id: SlotId, freq: u64) {
        self.list_remove(freq, id);
    }

    /// Case 4: *f* stays occupied and no bucket for *f+1* exists. A fresh
    /// bucket is spliced immediately above *f*.
    fn stay_and_create(&mut self, id: SlotId, freq: u64) {
        self.list_remove(freq, id);
        let (_, next) = self.bucket_links(freq);
        self.insert_bucket(freq + 1, Some(freq), next);
        if self.max_freq == freq {
            self.max_freq = freq + 1;
        }
    }

    /// Removes the mapping for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    pub fn remove(&mut self, key: &K) {
        let id = self
            .index
            .remove(key)
            .expect("attempted to remove an absent key");
        self.remove_entry(id);
    }

    /// Removes the oldest arrival in the minimum-frequency bucket and
    /// returns its key.
    ///
    /// # Panics
    ///
    /// Panics if the store is empty.
    pub fn evict_least_frequent(&mut self) -> K {
        assert!(
            self.min_freq != 0,
            "attempted to evict from an empty store"
        );
        let id = self
            .buckets
            .get(&self.min_freq)
            .expect("bucket missing")
            .tail
            .expect("non-empty bucket lacks a tail");
        let key = self
            .entries
            .get(id)
            .expect("indexed entry missing")
            .key
            .clone();
        self.index.remove(&key);
        self.remove_entry(id);
        key
    }

    fn remove_entry(&mut self, id: SlotId) {
        let freq = self.entries.get(id).expect("indexed entry missing").freq;
        self.list_remove(freq, id);
        if self.bucket_is_empty(freq) {
            let (prev, next) = self.bucket_links(freq);
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
            if self.max_freq == freq {
                self.max_freq = prev.unwrap_or(0);
            }
        }
        self.entries.remove(id);
    }

    /// Verifies the index/arena/bucket-sequence consistency invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "index and arena sizes do not match ({} != {})",
                self.index.len(),
                self.entries.len()
            )));
        }

        if self.entries.is_empty() {
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("empty store still owns buckets"));
            }
            if self.min_freq != 0 || self.max_freq != 0 {
                return Err(InvariantError::new("empty store has frequency terminals"));
            }
            return Ok(());
        }

        if self.min_freq == 0 || self.max_freq == 0 {
            return Err(InvariantError::new(
                "non-empty store lacks a frequency terminal",
            ));
        }

        // Walk the bucket sequence from min to max.
        let mut walked_buckets = 0usize;
        let mut walked_entries = 0usize;
        let mut current = Some(self.min_freq);
        let mut lower: Option<u64> = None;
        while let Some(freq) = current {
            if freq < 1 {
                return Err(InvariantError::new("bucket with frequency below 1"));
            }
            let bucket = self
                .buckets
                .get(&freq)
                .ok_or_else(|| InvariantError::new("bucket sequence names a missing bucket"))?;
            if bucket.prev != lower {
                return Err(InvariantError::new("bucket prev link is wrong"));
            }
            if let Some(lower) = lower {
                if lower >= freq {
                    return Err(InvariantError::new("bucket sequence is not ascending"));
                }
            }
            if bucket.next.is_none() && freq != self.max_freq {
                return Err(InvariantError::new("bucket sequence ends before max"));
            }

            // Walk the bucket's entry list.
            let mut entry_id = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = entry_id {
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| InvariantError::new("bucket list names a vacated slot"))?;
                if entry.freq != freq {
                    return Err(InvariantError::new("entry frequency disagrees with bucket"));
                }
                if entry.prev != last {
                    return Err(InvariantError::new("entry prev link is wrong"));
                }
                if self.index.get(&entry.key) != Some(&id) {
                    return Err(InvariantError::new(
                        "entry key is not indexed at its own slot",
                    ));
                }
                last = Some(id);
                entry_id = entry.next;
                count += 1;
                if count > self.entries.len() {
                    return Err(InvariantError::new("bucket list likely contains a cycle"));
                }
            }
            if bucket.tail != last {
                return Err(InvariantError::new("bucket tail link is wrong"));
            }
            if count == 0 {
                return Err(InvariantError::new("empty bucket was not destroyed"));
            }

            walked_entries += count;
            walked_buckets += 1;
            if walked_buckets > self.buckets.len() {
                return Err(InvariantError::new("bucket sequence likely contains a cycle"));
            }
            lower = Some(freq);
            current = bucket.next;
        }

        if walked_buckets != self.buckets.len() {
            return Err(InvariantError::new(
                "bucket sequence does not reach every bucket",
            ));
        }
        if walked_entries != self.entries.len() {
            return Err(InvariantError::new(
                "bucket lists do not account for every entry",
            ));
        }
        Ok(())
    }

    fn bucket_links(&self, freq: u64) -> (Option<u64>, Option<u64>) {
        let bucket = self.buckets.get(&freq).expect("bucket missing");
        (bucket.prev, bucket.next)
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev {
            if let Some(prev_bucket) = self.buckets.get_mut(&prev) {
                prev_bucket.next = Some(freq);
            }
        }
        if let Some(next) = next {
            if let Some(next_bucket) = self.buckets.get_mut(&next) {
                next_bucket.prev = Some(freq);
            }
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev {
            if let Some(prev_bucket) = self.buckets.get_mut(&prev) {
                prev_bucket.next = next;
            }
        }
        if let Some(next) = next {
            if let Some(next_bucket) = self.buckets.get_mut(&next) {
                next_bucket.prev = prev;
            }
        }
        self.buckets.remove(&freq);
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let bucket = self.buckets.get_mut(&freq).expect("bucket missing");
        let old_head = bucket.head;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(entry) = self.entries.get_mut(old_head) {
                entry.prev = Some(id);
            }
        } else {
            bucket.tail = Some(id);
        }
        bucket.head = Some(id);
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) {
        let (prev, next) = {
            let entry = self.entries.get(id).expect("indexed entry missing");
            (entry.prev, entry.next)
        };

        let bucket = self.buckets.get_mut(&freq).expect("bucket missing");
        if let Some(prev) = prev {
            if let Some(entry) = self.entries.get_mut(prev) {
                entry.next = next;
            }
        } else {
            bucket.head = next;
        }
        if let Some(next) = next {
            if let Some(entry) = self.entries.get_mut(next) {
                entry.prev = prev;
            }
        } else {
            bucket.tail = prev;
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }
}

impl<K, V> EvictionStore<K, V> for LfuStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn len(&self) -> usize {
        LfuStore::len(self)
    }

    fn add_fresh(&mut self, key: K, value: &Arc<V>) {
        LfuStore::add_fresh(self, key, value);
    }

    fn replace_value(&mut self, key: &K, value: &Arc<V>) {
        LfuStore::replace_value(self, key, value);
    }

    fn remove(&mut self, key: &K) {
        LfuStore::remove(self, key);
    }

    fn promote(&mut self, key: &K) {
        self.increment_frequency(key);
    }

    fn evict(&mut self) -> K {
        self.evict_least_frequent()
    }

    fn contains(&self, key: &K) -> bool {
        LfuStore::contains(self, key)
    }

    fn lookup(&self, key: &K) -> Option<Arc<V>> {
        LfuStore::lookup(self, key)
    }
}

/// Iterator over the keys of one bucket, newest arrival first.
pub struct KeysAtFrequency<'a, K, V> {
    store: &'a LfuStore<K, V>,
    current: Option<SlotId>,
}

impl<'a, K, V> Iterator for KeysAtFrequency<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let entry = self.store.entries.get(id)?;
        self.current = entry.next;
        Some(&entry.key)
    }
}
