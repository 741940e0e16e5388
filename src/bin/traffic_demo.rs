//! Random-traffic showcase for both eviction policies.
//!
//! Run with: cargo run --bin traffic_demo
//!
//! Puts each policy through a mixed put/get workload over a small key range
//! and prints the resulting stats summary. Stored payloads are kept alive
//! only through a sliding retention window, so some of them are reclaimed
//! before they are read back and show up as near-hits.

use std::collections::VecDeque;
use std::sync::Arc;

use softcache::{Cache, EvictionPolicy};

const CACHE_CAPACITY: usize = 75;
const KEY_RANGE: u64 = 100;
const NUM_OF_REQUESTS: u64 = 1000;
const PERCENTAGE_OF_GETS: u64 = 50;

/// How many of the most recently stored payloads stay strongly referenced.
const RETENTION_WINDOW: usize = 40;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

fn main() {
    for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
        let mut cache: Cache<u64, Vec<u8>> =
            Cache::new(CACHE_CAPACITY, policy).expect("demo configuration is valid");
        let mut rng = XorShift64::new(0x5EED);
        let mut retained: VecDeque<Arc<Vec<u8>>> = VecDeque::with_capacity(RETENTION_WINDOW);

        for _ in 0..NUM_OF_REQUESTS {
            let key = rng.next_u64() % KEY_RANGE;
            if rng.next_u64() % 100 >= PERCENTAGE_OF_GETS {
                let size = 1024 * (1 + (rng.next_u64() % 10) as usize);
                let payload = Arc::new(vec![0u8; size]);
                cache.put(key, &payload);

                // Age out the oldest strong reference; its payload becomes
                // reclaimable and a later get on its key is a near-hit.
                retained.push_back(payload);
                if retained.len() > RETENTION_WINDOW {
                    retained.pop_front();
                }
            } else {
                let _ = cache.get(&key);
            }
        }

        println!("\n==========");
        println!("{}", cache.stats());
    }
}
