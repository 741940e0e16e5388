//! Incremental cache construction with validated defaults.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use softcache::builder::CacheBuilder;
//! use softcache::EvictionPolicy;
//!
//! let mut cache = CacheBuilder::new()
//!     .capacity(500)
//!     .policy(EvictionPolicy::Lfu)
//!     .try_build::<u64, String>()
//!     .unwrap();
//!
//! let value = Arc::new("hello".to_string());
//! cache.put(1, &value);
//! assert_eq!(cache.get(&1).as_deref(), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::cache::{Cache, EvictionPolicy};
use crate::error::ConfigError;

/// Capacity used when the builder is not told otherwise.
pub const DEFAULT_CAPACITY: usize = 100;

/// Policy used when the builder is not told otherwise.
pub const DEFAULT_POLICY: EvictionPolicy = EvictionPolicy::Lru;

/// Builder for [`Cache`] instances.
///
/// Validation happens in [`try_build`](Self::try_build): a zero capacity is
/// rejected with a [`ConfigError`] and no partial cache is produced.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    policy: EvictionPolicy,
}

impl CacheBuilder {
    /// Creates a builder with the default capacity and policy.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: DEFAULT_POLICY,
        }
    }

    /// Sets the capacity bound.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the eviction policy.
    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the parameters and builds the cache.
    pub fn try_build<K, V>(self) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        Cache::new(self.capacity, self.policy)
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn defaults_are_lru_at_one_hundred() {
        let cache = CacheBuilder::new().try_build::<u32, String>().unwrap();
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        assert_eq!(cache.policy(), EvictionPolicy::Lru);
    }

    #[test]
    fn zero_capacity_fails_fast() {
        let err = CacheBuilder::new()
            .capacity(0)
            .try_build::<u32, String>()
            .unwrap_err();
        assert!(err.to_string().contains("zero capacity"));
    }

    #[test]
    fn built_cache_is_usable_under_both_policies() {
        for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
            let mut cache = CacheBuilder::new()
                .capacity(2)
                .policy(policy)
                .try_build::<u32, &str>()
                .unwrap();
            let one = Arc::new("one");
            let two = Arc::new("two");
            let three = Arc::new("three");

            assert!(cache.put(1, &one).is_none());
            assert!(cache.put(2, &two).is_none());
            assert_eq!(cache.get(&1).as_deref(), Some(&"one"));

            cache.put(3, &three); // evicts key 2 under both policies
            assert_eq!(cache.len(), 2);
            assert!(cache.contains_key(&1));
            assert!(!cache.contains_key(&2));
            assert!(cache.contains_key(&3));
            assert_eq!(cache.policy(), policy);
        }
    }
}
