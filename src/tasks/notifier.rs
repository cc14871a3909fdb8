//! Notification Dispatch Task
//!
//! Delivers queued mutation events to the observer, off the cache lock.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::observer::{CacheEvent, CacheObserver};

/// Spawns the task that forwards events to `observer` in emission order.
///
/// The task ends once every sender has been dropped and the queue is
/// drained. A panicking observer loses that one event; delivery continues.
pub fn spawn_notifier_task<V>(
    mut events: UnboundedReceiver<CacheEvent<V>>,
    observer: Arc<dyn CacheObserver<V>>,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let kind = event.kind();
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.notify(event)));
            if delivered.is_err() {
                warn!(event = %kind, "observer panicked; notification dropped");
            }
        }
        debug!("notifier stopped: event channel closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tokio::sync::mpsc;

    use crate::observer::CacheEventKind;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(CacheEventKind, String)>>,
    }

    impl CacheObserver<u32> for Recorder {
        fn notify(&self, event: CacheEvent<u32>) {
            if event.key() == "boom" {
                panic!("observer failure");
            }
            self.seen
                .lock()
                .unwrap()
                .push((event.kind(), event.key().to_string()));
        }
    }

    #[tokio::test]
    async fn test_notifier_delivers_in_order_and_survives_panics() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::unbounded_channel::<CacheEvent<u32>>();
        let handle = spawn_notifier_task(rx, recorder.clone());

        tx.send(CacheEvent::put("a".to_string(), 1)).unwrap();
        tx.send(CacheEvent::put("boom".to_string(), 2)).unwrap();
        tx.send(CacheEvent::remove("a".to_string())).unwrap();
        drop(tx);

        handle.await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (CacheEventKind::Put, "a".to_string()),
                (CacheEventKind::Remove, "a".to_string()),
            ]
        );
    }
}
