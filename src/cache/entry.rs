//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub created: u64,
    /// Most recent successful read or write (Unix milliseconds)
    pub last_accessed: u64,
    /// Seconds until expiry, counted from `created`
    pub ttl: u64,
    /// Estimated byte footprint, computed once at insertion
    pub size: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - TTL in seconds
    /// * `size` - Estimated size in bytes
    /// * `now` - Current time in Unix milliseconds
    pub fn new(value: V, ttl: u64, size: u64, now: u64) -> Self {
        Self {
            value,
            created: now,
            last_accessed: now,
            ttl,
            size,
        }
    }

    // == Expires At ==
    /// Last millisecond at which the entry is still fresh.
    pub fn expires_at(&self) -> u64 {
        self.created.saturating_add(self.ttl.saturating_mul(1000))
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is still fresh at exactly
    /// `created + ttl * 1000` and expired strictly after it.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at()
    }

    // == Touch ==
    /// Records an access at `now`. Never moves `last_accessed` backwards.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed = self.last_accessed.max(now);
    }
}
