//! Tidecache - An in-process, bounded, time-aware key/value cache
//!
//! Standalone host: runs one engine with a logging observer until a
//! shutdown signal arrives, then reports final statistics.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tidecache::{CacheConfig, CacheEngine, TracingObserver};

/// Main entry point for the standalone cache host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the engine with its maintenance tasks
/// 4. Wait for SIGINT/SIGTERM
/// 5. Shut the engine down and log final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(?config, "configuration loaded");

    let engine: CacheEngine<Value> = CacheEngine::builder(config)
        .observer(Arc::new(TracingObserver))
        .start()
        .context("failed to start cache engine")?;

    shutdown_signal().await?;

    let stats = engine.stats().await;
    info!(
        "final stats: entries={}, memory={} bytes, hits={}, misses={}, hit_rate={:.1}%",
        stats.total_entries, stats.memory_usage, stats.hits, stats.misses, stats.hit_rate
    );
    engine.shutdown().await;

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        result = terminate => {
            result?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    Ok(())
}
