//! Statistics Refresh Task
//!
//! Background task that periodically recomputes derived statistics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::tasks::SharedStore;

/// Spawns a background task that refreshes cache statistics on an interval.
pub fn spawn_stats_task<V>(cache: SharedStore<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting stats refresh task");

        loop {
            tokio::time::sleep(interval).await;

            let stats = {
                let mut cache_guard = cache.lock().await;
                cache_guard.refresh_stats();
                cache_guard.stats()
            };

            debug!(
                entries = stats.total_entries,
                memory_usage = stats.memory_usage,
                hit_rate = stats.hit_rate,
                avg_access_time_ms = stats.avg_access_time,
                "stats refreshed"
            );
        }
    })
}
