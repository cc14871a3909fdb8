//! Background Tasks Module
//!
//! Contains the tasks an engine runs for its whole lifetime.
//!
//! # Tasks
//! - Stale sweep: removes expired entries every `check_interval`
//! - Stats refresh: recomputes derived statistics every `stats_interval`
//! - Notifier: delivers mutation events to the observer

mod notifier;
mod stats;
mod sweep;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::CacheStore;

pub use notifier::spawn_notifier_task;
pub use stats::spawn_stats_task;
pub use sweep::spawn_sweep_task;

/// The single lock every cache operation and maintenance action goes through.
pub type SharedStore<V> = Arc<Mutex<CacheStore<V>>>;
