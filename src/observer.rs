//! Observer Module
//!
//! Mutation events and the sinks that receive them.
//!
//! The engine never calls a sink directly. Events are queued on a channel and
//! delivered by a background task, so a slow or failing sink cannot stall or
//! fail a cache operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

// == Event Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheEventKind {
    Put,
    Remove,
}

impl CacheEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheEventKind::Put => "put",
            CacheEventKind::Remove => "remove",
        }
    }
}

impl fmt::Display for CacheEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Event ==
/// A single mutation, as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum CacheEvent<V> {
    /// A key was inserted or overwritten
    Put {
        key: String,
        value: V,
        at: DateTime<Utc>,
    },
    /// A key was removed explicitly, by eviction, or by expiry
    Remove { key: String, at: DateTime<Utc> },
}

impl<V> CacheEvent<V> {
    pub fn put(key: String, value: V) -> Self {
        CacheEvent::Put {
            key,
            value,
            at: Utc::now(),
        }
    }

    pub fn remove(key: String) -> Self {
        CacheEvent::Remove { key, at: Utc::now() }
    }

    pub fn kind(&self) -> CacheEventKind {
        match self {
            CacheEvent::Put { .. } => CacheEventKind::Put,
            CacheEvent::Remove { .. } => CacheEventKind::Remove,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CacheEvent::Put { key, .. } | CacheEvent::Remove { key, .. } => key,
        }
    }
}

// == Observer Trait ==
/// Receives best-effort notifications of cache mutations.
///
/// Implementations must not block for long; delivery happens on a shared
/// background task. A panic inside `notify` is caught and logged.
pub trait CacheObserver<V>: Send + Sync {
    fn notify(&self, event: CacheEvent<V>);
}

// == Tracing Observer ==
/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl<V> CacheObserver<V> for TracingObserver {
    fn notify(&self, event: CacheEvent<V>) {
        debug!(event = %event.kind(), key = event.key(), "cache mutation");
    }
}

// == Broadcast Observer ==
/// Fans events out to zero or more passive listeners.
///
/// Events sent while nobody is subscribed are dropped. Listeners that fall
/// more than `capacity` events behind lose the oldest ones.
#[derive(Debug, Clone)]
pub struct BroadcastObserver<V> {
    sender: broadcast::Sender<CacheEvent<V>>,
}

impl<V: Clone> BroadcastObserver<V> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Registers a new listener that sees every event sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent<V>> {
        self.sender.subscribe()
    }
}

impl<V: Clone + Send + Sync> CacheObserver<V> for BroadcastObserver<V> {
    fn notify(&self, event: CacheEvent<V>) {
        // No listeners is not an error
        let _ = self.sender.send(event);
    }
}
