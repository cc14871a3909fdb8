//! Cache Statistics Module
//!
//! Tracks entry count, memory usage, hit/miss counters and access latency.

use serde::Serialize;

// == Cache Stats ==
/// Running statistics record.
///
/// `hit_rate` and `avg_access_time` are derived from the counters and are
/// kept current by every recording method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of live entries
    pub total_entries: usize,
    /// Sum of estimated sizes of live entries, in bytes
    pub memory_usage: u64,
    /// Number of successful retrievals
    pub hits: u64,
    /// Number of failed retrievals (key not found or expired)
    pub misses: u64,
    /// hits / (hits + misses) * 100, 0 before any request
    pub hit_rate: f64,
    /// Mean latency of get operations, in milliseconds.
    ///
    /// Puts are not timed: the mean is taken over `hits + misses`, which
    /// only counts reads.
    pub avg_access_time: f64,
    /// Entries removed to relieve memory pressure
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total get requests served.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Calculates the hit rate as a percentage.
    pub fn compute_hit_rate(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    // == Record Hit ==
    /// Counts a hit that took `elapsed_ms`.
    pub fn record_hit(&mut self, elapsed_ms: f64) {
        self.hits += 1;
        self.finish_request(elapsed_ms);
    }

    // == Record Miss ==
    /// Counts a miss that took `elapsed_ms`.
    pub fn record_miss(&mut self, elapsed_ms: f64) {
        self.misses += 1;
        self.finish_request(elapsed_ms);
    }

    fn finish_request(&mut self, elapsed_ms: f64) {
        self.hit_rate = self.compute_hit_rate();
        // n already includes the request being recorded
        let n = self.requests() as f64;
        self.avg_access_time = (self.avg_access_time * (n - 1.0) + elapsed_ms) / n;
    }

    // == Memory Accounting ==
    pub fn add_entry(&mut self, size: u64) {
        self.total_entries += 1;
        self.memory_usage += size;
    }

    pub fn remove_entry(&mut self, size: u64) {
        debug_assert!(self.total_entries > 0, "entry count underflow");
        debug_assert!(self.memory_usage >= size, "memory usage underflow");
        self.total_entries = self.total_entries.saturating_sub(1);
        self.memory_usage = self.memory_usage.saturating_sub(size);
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Refresh ==
    /// Recomputes derived fields from the counters.
    pub fn refresh(&mut self) {
        self.hit_rate = self.compute_hit_rate();
        if self.requests() == 0 {
            self.avg_access_time = 0.0;
        }
    }

    // == Reset ==
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.memory_usage, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.avg_access_time, 0.0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.compute_hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_three_hits_one_miss() {
        let mut stats = CacheStats::new();
        stats.record_hit(0.0);
        stats.record_hit(0.0);
        stats.record_hit(0.0);
        stats.record_miss(0.0);
        assert_eq!(stats.hit_rate, 75.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut stats = CacheStats::new();
        stats.record_miss(0.0);
        stats.record_miss(0.0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_running_mean_latency() {
        let mut stats = CacheStats::new();
        stats.record_hit(2.0);
        assert_eq!(stats.avg_access_time, 2.0);
        stats.record_miss(4.0);
        assert_eq!(stats.avg_access_time, 3.0);
        stats.record_hit(6.0);
        assert!((stats.avg_access_time - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_memory_accounting() {
        let mut stats = CacheStats::new();
        stats.add_entry(10);
        stats.add_entry(20);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.memory_usage, 30);

        // An overwrite is a removal of the old size plus an addition
        stats.remove_entry(10);
        stats.add_entry(4);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.memory_usage, 24);

        stats.remove_entry(20);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.memory_usage, 4);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut stats = CacheStats::new();
        stats.add_entry(10);
        stats.record_hit(1.0);
        stats.record_eviction();
        stats.record_expiration();
        stats.reset();
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(CacheStats::new()).unwrap();
        assert!(json.get("totalEntries").is_some());
        assert!(json.get("memoryUsage").is_some());
        assert!(json.get("hitRate").is_some());
        assert!(json.get("avgAccessTime").is_some());
    }
}
