//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and memory-bounded eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::cache::{
    CacheEntry, CacheStats, Clock, JsonSizeEstimator, LruTracker, SizeEstimator, SystemClock,
};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::observer::CacheEvent;

// == Cache Store ==
/// Synchronous cache state. Every method runs to completion without
/// yielding, so callers serialize access with a single lock.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Running statistics
    stats: CacheStats,
    /// Configuration snapshot
    config: CacheConfig,
    /// Size strategy applied once per insertion
    estimator: Box<dyn SizeEstimator<V>>,
    /// Time source for timestamps and expiry
    clock: Arc<dyn Clock>,
    /// Outbound mutation events, if anyone listens
    events: Option<UnboundedSender<CacheEvent<V>>>,
    /// Whether the advisory entry cap is currently exceeded
    over_entry_cap: bool,
}

impl<V: Serialize + Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore using JSON size estimation and the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_parts(config, Box::new(JsonSizeEstimator), Arc::new(SystemClock::new()))
    }
}

impl<V: Clone> CacheStore<V> {
    /// Creates a new CacheStore with an explicit size strategy and clock.
    pub fn with_parts(
        config: CacheConfig,
        estimator: Box<dyn SizeEstimator<V>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            config,
            estimator,
            clock,
            events: None,
            over_entry_cap: false,
        }
    }

    // == Event Wiring ==
    /// Routes mutation events to `sender`.
    ///
    /// The queue is unbounded so the lock holder never waits on delivery. A
    /// receiver that falls behind lets it grow, with each queued `Put` holding
    /// its own copy of the value.
    pub fn attach_events(&mut self, sender: UnboundedSender<CacheEvent<V>>) {
        self.events = Some(sender);
    }

    /// Stops emitting events. Dropping the sender lets the receiver drain and finish.
    pub fn detach_events(&mut self) {
        self.events = None;
    }

    // == Put ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value is overwritten and its timestamps
    /// and TTL are reset. If the new entry would push memory usage past
    /// `max_memory`, least recently used entries are evicted first. An entry
    /// that alone exceeds the ceiling is still stored once everything else
    /// has been evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds (uses default_ttl if None)
    ///
    /// # Errors
    /// Returns `CacheError::Serialization` if the value cannot be sized. The
    /// cache is left unchanged in that case.
    pub fn put(&mut self, key: String, value: V, ttl: Option<u64>) -> Result<()> {
        let size = self.estimator.estimate(&value)?;
        let now = self.clock.now_ms();

        // An overwritten entry stops counting before room is made for its replacement
        if let Some(old) = self.entries.remove(&key) {
            self.lru.remove(&key);
            self.stats.remove_entry(old.size);
        }

        if self.stats.memory_usage + size > self.config.max_memory {
            self.evict_for(size);
        }

        // Only pay for the value copy when someone listens
        let event = self
            .events
            .is_some()
            .then(|| CacheEvent::put(key.clone(), value.clone()));

        let ttl = ttl.unwrap_or(self.config.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl, size, now));
        self.lru.touch(&key);
        self.stats.add_entry(size);
        self.check_entry_cap();

        debug!(key = %key, size, ttl, "cache put");
        if let Some(event) = event {
            self.emit(event);
        }
        self.check_invariants();
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses. A hit refreshes
    /// the entry's recency but never its creation time or TTL.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let started = Instant::now();
        let now = self.clock.now_ms();

        let stale = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit(elapsed_ms(started));
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if stale {
            self.remove_entry(key);
            self.stats.record_expiration();
            debug!(key, "cache get hit an expired entry");
        }
        self.stats.record_miss(elapsed_ms(started));
        self.check_invariants();
        None
    }

    // == Remove ==
    /// Removes an entry by key. Returns false if the key was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key).is_some();
        self.check_entry_cap();
        self.check_invariants();
        removed
    }

    // == Clear ==
    /// Removes every entry and resets all statistics to zero.
    ///
    /// No per-key events are emitted.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.reset();
        self.over_entry_cap = false;
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Refresh Stats ==
    /// Recomputes derived statistics from the counters.
    pub fn refresh_stats(&mut self) {
        self.stats.refresh();
        self.check_invariants();
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache, read or not.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        // Stable event order regardless of hash layout
        expired_keys.sort_unstable();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove_entry(&key);
            self.stats.record_expiration();
        }

        self.check_entry_cap();
        self.check_invariants();
        count
    }

    // == Contains Key ==
    /// Checks for a live entry without touching statistics or recency.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internal Helpers ==

    /// Evicts least recently used entries until `incoming` bytes fit or the
    /// cache is empty.
    fn evict_for(&mut self, incoming: u64) {
        while self.stats.memory_usage + incoming > self.config.max_memory {
            let Some(victim) = self.lru.evict_oldest() else {
                break;
            };
            self.remove_entry(&victim);
            self.stats.record_eviction();
            debug!(key = %victim, "evicted under memory pressure");
        }
    }

    /// Full removal: map, recency index, accounting and event.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.remove_entry(entry.size);
        self.emit(CacheEvent::remove(key.to_string()));
        Some(entry)
    }

    fn emit(&self, event: CacheEvent<V>) {
        if let Some(sender) = &self.events {
            // A closed channel only means nobody is listening anymore
            let _ = sender.send(event);
        }
    }

    fn check_entry_cap(&mut self) {
        let over = self.entries.len() > self.config.max_entries;
        if over && !self.over_entry_cap {
            warn!(
                entries = self.entries.len(),
                max_entries = self.config.max_entries,
                "cache exceeded its advisory entry count"
            );
        }
        self.over_entry_cap = over;
    }

    fn check_invariants(&self) {
        debug_assert_eq!(self.stats.total_entries, self.entries.len());
        debug_assert_eq!(self.lru.len(), self.entries.len());
        debug_assert_eq!(
            self.stats.memory_usage,
            self.entries.values().map(|e| e.size).sum::<u64>()
        );
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
