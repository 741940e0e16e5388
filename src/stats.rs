//! Per-cache request counters and the read-only stats view.
//!
//! The façade owns one `CacheStats` and bumps a counter for every request
//! outcome. [`StatsSnapshot`] is the public view: a `Copy` of the counters
//! plus size/capacity/policy gauges captured at snapshot time. Request
//! totals and share ratios are derived on demand and never stored.
//!
//! Outcome taxonomy:
//!
//! - `put` → *insertion* (fresh key, possibly preceded by an *eviction*)
//!   or *update* (existing key).
//! - `get` → *hit* (key present, value live), *near-hit* (key present but
//!   the value was reclaimed), or *miss* (key absent).

use std::fmt;

use crate::cache::EvictionPolicy;

/// Monotone per-instance outcome counters.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    hits: u64,
    near_hits: u64,
    misses: u64,
    insertions: u64,
    updates: u64,
    evictions: u64,
}

impl CacheStats {
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_near_hit(&mut self) {
        self.near_hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub(crate) fn record_update(&mut self) {
        self.updates += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn snapshot(
        &self,
        size: usize,
        capacity: usize,
        policy: EvictionPolicy,
    ) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits,
            near_hits: self.near_hits,
            misses: self.misses,
            insertions: self.insertions,
            updates: self.updates,
            evictions: self.evictions,
            size,
            capacity,
            policy,
        }
    }
}

/// Read-only view of a cache's counters and gauges.
///
/// Returned by [`Cache::stats`](crate::Cache::stats). The share methods are
/// pure read-time computations; a zero denominator yields 0.0.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    /// Get requests that returned a live value.
    pub hits: u64,
    /// Get requests whose key was indexed but whose value was reclaimed.
    pub near_hits: u64,
    /// Get requests for keys not in the cache.
    pub misses: u64,
    /// Put requests that created a fresh mapping.
    pub insertions: u64,
    /// Put requests that replaced an existing mapping's value.
    pub updates: u64,
    /// Entries removed to make room for an insertion.
    pub evictions: u64,
    /// Number of mappings at snapshot time.
    pub size: usize,
    /// Configured capacity bound.
    pub capacity: usize,
    /// The policy the cache was built with.
    pub policy: EvictionPolicy,
}

impl StatsSnapshot {
    /// Total put requests: insertions plus updates.
    pub fn put_requests(&self) -> u64 {
        self.insertions + self.updates
    }

    /// Total get requests: hits plus near-hits plus misses.
    pub fn get_requests(&self) -> u64 {
        self.hits + self.near_hits + self.misses
    }

    /// Total requests of both kinds.
    pub fn requests(&self) -> u64 {
        self.put_requests() + self.get_requests()
    }

    /// Put requests as a share of all requests.
    pub fn put_share(&self) -> f64 {
        ratio(self.put_requests(), self.requests())
    }

    /// Get requests as a share of all requests.
    pub fn get_share(&self) -> f64 {
        ratio(self.get_requests(), self.requests())
    }

    /// Insertions as a share of put requests.
    pub fn insertion_share(&self) -> f64 {
        ratio(self.insertions, self.put_requests())
    }

    /// Updates as a share of put requests.
    pub fn update_share(&self) -> f64 {
        ratio(self.updates, self.put_requests())
    }

    /// Evictions as a share of insertions.
    pub fn eviction_share(&self) -> f64 {
        ratio(self.evictions, self.insertions)
    }

    /// Hits as a share of get requests.
    pub fn hit_share(&self) -> f64 {
        ratio(self.hits, self.get_requests())
    }

    /// Near-hits as a share of get requests.
    pub fn near_hit_share(&self) -> f64 {
        ratio(self.near_hits, self.get_requests())
    }

    /// Misses as a share of get requests.
    pub fn miss_share(&self) -> f64 {
        ratio(self.misses, self.get_requests())
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn pct(share: f64) -> i64 {
    (share * 100.0).round() as i64
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} cache (max. capacity: {}):",
            self.policy, self.capacity
        )?;
        writeln!(f, "- current size : {}", self.size)?;
        writeln!(f, "- requests     : {}", self.requests())?;
        writeln!(
            f,
            "    - put requests : {}% ({})",
            pct(self.put_share()),
            self.put_requests()
        )?;
        writeln!(
            f,
            "        - insertions   : {}% ({}) (incl. {}% evictions ({}))",
            pct(self.insertion_share()),
            self.insertions,
            pct(self.eviction_share()),
            self.evictions
        )?;
        writeln!(
            f,
            "        - updates      : {}% ({})",
            pct(self.update_share()),
            self.updates
        )?;
        writeln!(
            f,
            "    - get requests : {}% ({})",
            pct(self.get_share()),
            self.get_requests()
        )?;
        writeln!(
            f,
            "        - hits         : {}% ({})",
            pct(self.hit_share()),
            self.hits
        )?;
        writeln!(
            f,
            "        - near-hits    : {}% ({})",
            pct(self.near_hit_share()),
            self.near_hits
        )?;
        write!(
            f,
            "        - misses       : {}% ({})",
            pct(self.miss_share()),
            self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StatsSnapshot {
        let mut stats = CacheStats::default();
        for _ in 0..6 {
            stats.record_hit();
        }
        stats.record_near_hit();
        for _ in 0..3 {
            stats.record_miss();
        }
        for _ in 0..8 {
            stats.record_insertion();
        }
        for _ in 0..2 {
            stats.record_update();
        }
        for _ in 0..4 {
            stats.record_eviction();
        }
        stats.snapshot(4, 16, EvictionPolicy::Lru)
    }

    #[test]
    fn request_totals_are_derived_from_counters() {
        let snap = snapshot();
        assert_eq!(snap.put_requests(), 10);
        assert_eq!(snap.get_requests(), 10);
        assert_eq!(snap.requests(), 20);
    }

    #[test]
    fn shares_divide_against_their_denominators() {
        let snap = snapshot();
        assert!((snap.put_share() - 0.5).abs() < 1e-9);
        assert!((snap.insertion_share() - 0.8).abs() < 1e-9);
        assert!((snap.update_share() - 0.2).abs() < 1e-9);
        assert!((snap.eviction_share() - 0.5).abs() < 1e-9);
        assert!((snap.hit_share() - 0.6).abs() < 1e-9);
        assert!((snap.near_hit_share() - 0.1).abs() < 1e-9);
        assert!((snap.miss_share() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn zero_denominators_yield_zero_shares() {
        let stats = CacheStats::default();
        let snap = stats.snapshot(0, 8, EvictionPolicy::Lfu);
        assert_eq!(snap.requests(), 0);
        assert_eq!(snap.put_share(), 0.0);
        assert_eq!(snap.hit_share(), 0.0);
        assert_eq!(snap.eviction_share(), 0.0);
    }

    #[test]
    fn display_reports_each_outcome_line() {
        let rendered = snapshot().to_string();
        assert!(rendered.starts_with("LRU cache (max. capacity: 16):"));
        assert!(rendered.contains("- current size : 4"));
        assert!(rendered.contains("- insertions   : 80% (8) (incl. 50% evictions (4))"));
        assert!(rendered.contains("- near-hits    : 10% (1)"));
        assert!(rendered.contains("- misses       : 30% (3)"));
    }
}
