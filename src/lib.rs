//! Tidecache - An in-process, bounded, time-aware key/value cache
//!
//! Provides TTL expiration, memory-bounded LRU eviction, hit/miss statistics
//! and best-effort mutation notifications.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod tasks;

pub use cache::{CacheStats, Clock, JsonSizeEstimator, ManualClock, SizeEstimator, SystemClock};
pub use config::CacheConfig;
pub use engine::{CacheEngine, EngineBuilder};
pub use error::{CacheError, Result};
pub use observer::{BroadcastObserver, CacheEvent, CacheEventKind, CacheObserver, TracingObserver};
