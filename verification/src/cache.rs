//! Verdict cache with a time-to-live.
//!
//! Entries are never evicted for age, only masked: once `stored_at + ttl`
//! has passed a lookup reports absent and the next aggregation overwrites
//! the slot.

use heirloom_types::{AggregateVerdict, Clock, Timestamp};
use heirloom_utils::HitCounter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default time-to-live: 24 hours.
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// A stored verdict.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub key: String,
    pub value: AggregateVerdict,
    pub stored_at: Timestamp,
}

/// Snapshot of cache usage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Stored entries, including ones masked by the TTL.
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, or `0.0` before the first lookup.
    pub hit_rate: f64,
}

/// Keyed store of past aggregate verdicts.
pub trait VerdictCache: Send + Sync {
    fn get(&self, key: &str) -> Option<AggregateVerdict>;
    fn put(&self, key: &str, value: AggregateVerdict);
    fn stats(&self) -> CacheStats;
}

/// In-process cache on a shared map.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
    counter: HitCounter,
}

impl MemoryCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_secs,
            clock,
            counter: HitCounter::new(),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Stored entries, including ones masked by the TTL.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry and reset the hit counters.
    pub fn clear(&self) {
        self.lock().clear();
        self.counter.reset();
    }

    // A poisoned lock only means a panic elsewhere mid-insert; the map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VerdictCache for MemoryCache {
    fn get(&self, key: &str) -> Option<AggregateVerdict> {
        let now = self.clock.now();
        let found = self
            .lock()
            .get(key)
            .filter(|entry| !entry.stored_at.has_expired(self.ttl_secs, now))
            .map(|entry| entry.value.clone());

        match found {
            Some(_) => self.counter.hit(),
            None => self.counter.miss(),
        }
        found
    }

    fn put(&self, key: &str, value: AggregateVerdict) {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            stored_at: self.clock.now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.counter.hits(),
            misses: self.counter.misses(),
            hit_rate: self.counter.ratio(),
        }
    }
}
