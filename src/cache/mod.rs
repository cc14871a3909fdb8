//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, memory-bounded LRU
//! eviction and statistics accounting.

mod clock;
mod entry;
mod lru;
mod size;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use size::{JsonSizeEstimator, SizeEstimator};
pub use stats::CacheStats;
pub use store::CacheStore;
