//! Stale Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::tasks::SharedStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the store lock for its full duration.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it at shutdown.
pub fn spawn_sweep_task<V>(cache: SharedStore<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting stale sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.lock().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("stale sweep: removed {} expired entries", removed);
            } else {
                debug!("stale sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use crate::cache::{CacheStore, JsonSizeEstimator, ManualClock};
    use crate::config::CacheConfig;

    fn shared_store(clock: &ManualClock) -> SharedStore<String> {
        let store = CacheStore::with_parts(
            CacheConfig::default(),
            Box::new(JsonSizeEstimator),
            Arc::new(clock.clone()),
        );
        Arc::new(Mutex::new(store))
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = shared_store(&clock);

        cache
            .lock()
            .await
            .put("expire_soon".to_string(), "value".to_string(), Some(1))
            .unwrap();
        clock.advance(1_001);

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        {
            let cache_guard = cache.lock().await;
            assert!(cache_guard.is_empty(), "expired entry should have been swept");
            let stats = cache_guard.stats();
            assert_eq!(stats.expirations, 1);
            // Swept without ever being read
            assert_eq!(stats.misses, 0);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let clock = ManualClock::new(0);
        let cache = shared_store(&clock);

        cache
            .lock()
            .await
            .put("long_lived".to_string(), "value".to_string(), Some(3600))
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.lock().await.contains_key("long_lived"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let clock = ManualClock::new(0);
        let handle = spawn_sweep_task(shared_store(&clock), Duration::from_millis(20));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "task should be finished after abort");
    }
}
