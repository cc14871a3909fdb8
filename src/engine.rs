//! Cache Engine
//!
//! Public surface of the cache: the store behind a single lock, plus the
//! maintenance and notification tasks it owns for its lifetime.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, Clock, JsonSizeEstimator, SizeEstimator, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::observer::CacheObserver;
use crate::tasks::{spawn_notifier_task, spawn_stats_task, spawn_sweep_task, SharedStore};

// == Maintenance Tasks ==
#[derive(Debug)]
struct MaintenanceTasks {
    sweep: JoinHandle<()>,
    stats: JoinHandle<()>,
}

impl MaintenanceTasks {
    fn abort(&self) {
        self.sweep.abort();
        self.stats.abort();
    }

    /// Aborts both tasks and waits until neither can run again.
    async fn stop(self) {
        self.abort();
        // Cancellation is the expected outcome
        let _ = self.sweep.await;
        let _ = self.stats.await;
    }
}

// == Cache Engine ==
/// A bounded, time-aware key/value cache.
///
/// Every operation takes the same lock for its whole duration, so no caller
/// or maintenance task ever observes a half-applied update. Must be started
/// from within a Tokio runtime.
///
/// # Example
/// ```no_run
/// # async fn demo() -> tidecache::Result<()> {
/// use tidecache::{CacheConfig, CacheEngine};
///
/// let engine = CacheEngine::start(CacheConfig::default())?;
/// engine.put("greeting", "hello".to_string(), Some(60)).await?;
/// assert_eq!(engine.get("greeting").await, Some("hello".to_string()));
/// engine.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct CacheEngine<V> {
    store: SharedStore<V>,
    tasks: Mutex<Option<MaintenanceTasks>>,
}

impl<V> fmt::Debug for CacheEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEngine").finish_non_exhaustive()
    }
}

impl<V> CacheEngine<V>
where
    V: Serialize + Clone + Send + 'static,
{
    // == Constructors ==
    /// Starts an engine with default parts and no observer.
    pub fn start(config: CacheConfig) -> Result<Self> {
        Self::builder(config).start()
    }

    pub fn builder(config: CacheConfig) -> EngineBuilder<V> {
        EngineBuilder::new(config)
    }
}

impl<V> CacheEngine<V>
where
    V: Clone + Send + 'static,
{
    // == Put ==
    /// Stores `value` under `key`, evicting least recently used entries if
    /// the memory ceiling requires it. `ttl` is in seconds.
    pub async fn put(&self, key: impl Into<String>, value: V, ttl: Option<u64>) -> Result<()> {
        self.store.lock().await.put(key.into(), value, ttl)
    }

    // == Get ==
    /// Returns the value for `key`, or None if absent or expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key)
    }

    // == Remove ==
    /// Removes `key`. Returns false if it was not present.
    pub async fn remove(&self, key: &str) -> bool {
        self.store.lock().await.remove(key)
    }

    // == Clear ==
    /// Drops every entry and zeroes all statistics.
    pub async fn clear(&self) {
        self.store.lock().await.clear();
        debug!("cache cleared");
    }

    // == Stats ==
    /// Returns a snapshot of the statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.store.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    // == Maintenance ==
    /// Runs one stale sweep now. Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        self.store.lock().await.sweep_expired()
    }

    /// Runs one statistics refresh now.
    pub async fn refresh_stats(&self) {
        self.store.lock().await.refresh_stats();
    }

    pub async fn is_running(&self) -> bool {
        self.tasks.lock().await.is_some()
    }

    // == Shutdown ==
    /// Stops both maintenance tasks, releases every entry and detaches the
    /// observer. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let Some(tasks) = self.tasks.lock().await.take() else {
            debug!("cache engine already shut down");
            return;
        };
        tasks.stop().await;

        let mut store = self.store.lock().await;
        store.clear();
        // Queued events still drain; nothing new is sent
        store.detach_events();
        info!("cache engine shut down");
    }
}

impl<V> Drop for CacheEngine<V> {
    fn drop(&mut self) {
        if let Some(tasks) = self.tasks.get_mut().take() {
            tasks.abort();
        }
    }
}

// == Engine Builder ==
/// Assembles an engine with a custom size strategy, clock or observer.
pub struct EngineBuilder<V> {
    config: CacheConfig,
    estimator: Box<dyn SizeEstimator<V>>,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn CacheObserver<V>>>,
}

impl<V> EngineBuilder<V>
where
    V: Serialize + Clone + Send + 'static,
{
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            estimator: Box::new(JsonSizeEstimator),
            clock: Arc::new(SystemClock::new()),
            observer: None,
        }
    }
}

impl<V> EngineBuilder<V>
where
    V: Clone + Send + 'static,
{
    pub fn size_estimator(mut self, estimator: impl SizeEstimator<V> + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CacheObserver<V>>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validates the configuration and spawns the engine's tasks.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` for a zero memory ceiling or interval.
    pub fn start(self) -> Result<CacheEngine<V>> {
        self.config.validate()?;

        let check_period = self.config.check_period();
        let stats_period = self.config.stats_period();
        info!(
            "starting cache engine: max_memory={} bytes, max_entries={}, default_ttl={}s, check_interval={}ms, stats_interval={}ms",
            self.config.max_memory,
            self.config.max_entries,
            self.config.default_ttl,
            self.config.check_interval,
            self.config.stats_interval
        );

        let mut store = CacheStore::with_parts(self.config, self.estimator, self.clock);
        if let Some(observer) = self.observer {
            let (sender, receiver) = mpsc::unbounded_channel();
            store.attach_events(sender);
            // Detached: exits once the store drops its sender
            let _ = spawn_notifier_task(receiver, observer);
        }

        let store = Arc::new(Mutex::new(store));
        let tasks = MaintenanceTasks {
            sweep: spawn_sweep_task(store.clone(), check_period),
            stats: spawn_stats_task(store.clone(), stats_period),
        };

        Ok(CacheEngine {
            store,
            tasks: Mutex::new(Some(tasks)),
        })
    }
}
