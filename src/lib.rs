//! softcache: bounded in-memory caching with LRU/LFU eviction and
//! weakly-retained values.
//!
//! Every core operation (insert, lookup, update, evict) is O(1)
//! regardless of cache size. Values are held through non-owning
//! [`SoftValue`](soft::SoftValue) slots, so the cache never keeps a payload
//! alive against the host's will; a lookup that finds the key but not the
//! payload is reported as a *near-hit* in the per-instance stats.
//!
//! ```
//! use std::sync::Arc;
//! use softcache::{Cache, EvictionPolicy};
//!
//! let mut cache = Cache::new(2, EvictionPolicy::Lfu).unwrap();
//! let a = Arc::new("alpha");
//! let b = Arc::new("beta");
//! let c = Arc::new("gamma");
//!
//! cache.put(1, &a);
//! cache.put(2, &b);
//! cache.get(&1); // key 1 now at frequency 2
//! cache.put(3, &c); // evicts key 2, the least frequently used
//!
//! assert!(cache.contains_key(&1));
//! assert!(!cache.contains_key(&2));
//! assert_eq!(cache.stats().evictions, 1);
//! ```
//!
//! Not thread-safe by design: wrap a cache in your own lock if you need to
//! share it across threads.

pub mod builder;
pub mod cache;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod soft;
pub mod stats;
pub mod traits;

pub use cache::{Cache, EvictionPolicy};
