//! Cache façade: one policy store, a capacity bound, and outcome counters.
//!
//! `Cache` translates `put`/`get`/`contains_key` into store operations,
//! enforces the capacity bound by evicting before every overflowing
//! insertion, and records each request outcome into its own
//! [`CacheStats`](crate::stats) counters.
//!
//! Values are weakly retained (see [`SoftValue`](crate::soft::SoftValue)):
//! a `get` can find the key indexed while the payload is already gone. That
//! outcome is a *near-hit*, distinct from a miss, and removes the
//! now-empty entry.
//!
//! Not thread-safe by contract: access is single-threaded, synchronous and
//! non-reentrant; callers needing concurrent access must wrap the cache in
//! their own mutual exclusion.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::policy::lfu::LfuStore;
use crate::policy::lru::LruStore;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::traits::EvictionStore;

/// Supported eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict the least recently touched entry.
    Lru,
    /// Evict the least frequently touched entry, oldest-inserted first
    /// among ties.
    Lfu,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => f.write_str("LRU"),
            EvictionPolicy::Lfu => f.write_str("LFU"),
        }
    }
}

enum StoreInner<K, V> {
    Lru(LruStore<K, V>),
    Lfu(LfuStore<K, V>),
}

impl<K, V> StoreInner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn as_dyn(&self) -> &dyn EvictionStore<K, V> {
        match self {
            StoreInner::Lru(store) => store,
            StoreInner::Lfu(store) => store,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn EvictionStore<K, V> {
        match self {
            StoreInner::Lru(store) => store,
            StoreInner::Lfu(store) => store,
        }
    }
}

/// Bounded in-memory cache with a construction-time eviction policy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use softcache::{Cache, EvictionPolicy};
///
/// let mut cache = Cache::new(2, EvictionPolicy::Lru).unwrap();
/// let a = Arc::new("alpha");
/// let b = Arc::new("beta");
/// let c = Arc::new("gamma");
///
/// cache.put(1, &a);
/// cache.put(2, &b);
/// cache.get(&1);
/// cache.put(3, &c); // evicts key 2, the least recently touched
///
/// assert!(cache.contains_key(&1));
/// assert!(!cache.contains_key(&2));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct Cache<K, V> {
    store: StoreInner<K, V>,
    capacity: usize,
    policy: EvictionPolicy,
    stats: CacheStats,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity and policy.
    ///
    /// Fails fast with a [`ConfigError`] when `capacity` is zero; no
    /// partial object is produced.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new(
                "attempted to create a cache with zero capacity",
            ));
        }
        let store = match policy {
            EvictionPolicy::Lru => StoreInner::Lru(LruStore::new(capacity)),
            EvictionPolicy::Lfu => StoreInner::Lfu(LfuStore::new(capacity)),
        };
        Ok(Self {
            store,
            capacity,
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Creates an LRU cache with the given capacity.
    pub fn lru(capacity: usize) -> Result<Self, ConfigError> {
        Self::new(capacity, EvictionPolicy::Lru)
    }

    /// Creates an LFU cache with the given capacity.
    pub fn lfu(capacity: usize) -> Result<Self, ConfigError> {
        Self::new(capacity, EvictionPolicy::Lfu)
    }

    /// Stores `value` under `key` and returns the previous value, if any
    /// was present and still live.
    ///
    /// An existing key keeps its position-creating metadata: the value slot
    /// is swapped in place, the key is promoted per policy, and an *update*
    /// is recorded. A fresh key may first force an *eviction* when the
    /// cache is full, then an *insertion*.
    ///
    /// The cache retains `value` only weakly: it stays retrievable for as
    /// long as the caller keeps a strong [`Arc`] alive.
    pub fn put(&mut self, key: K, value: &Arc<V>) -> Option<Arc<V>> {
        let store = self.store.as_dyn_mut();
        if store.contains(&key) {
            let previous = store.lookup(&key);
            store.replace_value(&key, value);
            store.promote(&key);
            self.stats.record_update();
            previous
        } else {
            if store.len() >= self.capacity {
                store.evict();
                self.stats.record_eviction();
            }
            store.add_fresh(key, value);
            self.stats.record_insertion();
            None
        }
    }

    /// Retrieves the value under `key`, promoting the key per policy.
    ///
    /// Returns `None` for an absent key (a *miss*) and for a key whose
    /// value has been reclaimed (a *near-hit*; the entry is removed, so a
    /// subsequent [`contains_key`](Self::contains_key) reports `false`).
    pub fn get(&mut self, key: &K) -> Option<Arc<V>> {
        let store = self.store.as_dyn_mut();
        if !store.contains(key) {
            self.stats.record_miss();
            return None;
        }
        match store.lookup(key) {
            Some(value) => {
                store.promote(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                store.remove(key);
                self.stats.record_near_hit();
                None
            }
        }
    }

    /// Returns `true` if a mapping for `key` is present, regardless of
    /// whether its value is still live. Does not promote and records
    /// nothing.
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.as_dyn().contains(key)
    }

    /// Returns the number of mappings currently held.
    pub fn len(&self) -> usize {
        self.store.as_dyn().len()
    }

    /// Returns `true` if the cache holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the eviction policy the cache was built with.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Captures the current counters and gauges as a read-only view.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.len(), self.capacity, self.policy)
    }
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
