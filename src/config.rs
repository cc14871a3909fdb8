//! Configuration Module
//!
//! Engine configuration snapshot, loadable from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default advisory entry count
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
/// Default memory ceiling in bytes (100 MiB)
pub const DEFAULT_MAX_MEMORY: u64 = 100 * 1024 * 1024;
/// Default TTL in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;
/// Default stale sweep period in milliseconds
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 60_000;
/// Default statistics refresh period in milliseconds
pub const DEFAULT_STATS_INTERVAL_MS: u64 = 30_000;

/// Cache engine configuration, fixed at construction.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Advisory entry count; crossing it is logged, never enforced
    pub max_entries: usize,
    /// Hard byte ceiling on estimated memory usage
    pub max_memory: u64,
    /// TTL in seconds for entries inserted without one
    pub default_ttl: u64,
    /// Stale sweep period in milliseconds
    pub check_interval: u64,
    /// Statistics refresh period in milliseconds
    pub stats_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Advisory entry count (default: 1000)
    /// - `CACHE_MAX_MEMORY` - Memory ceiling in bytes (default: 104857600)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `CACHE_CHECK_INTERVAL_MS` - Sweep period in ms (default: 60000)
    /// - `CACHE_STATS_INTERVAL_MS` - Stats refresh period in ms (default: 30000)
    pub fn from_env() -> Self {
        Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            max_memory: env_or("CACHE_MAX_MEMORY", DEFAULT_MAX_MEMORY),
            default_ttl: env_or("CACHE_DEFAULT_TTL", DEFAULT_TTL_SECS),
            check_interval: env_or("CACHE_CHECK_INTERVAL_MS", DEFAULT_CHECK_INTERVAL_MS),
            stats_interval: env_or("CACHE_STATS_INTERVAL_MS", DEFAULT_STATS_INTERVAL_MS),
        }
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_memory == 0 {
            return Err(CacheError::InvalidConfig(
                "max_memory must be greater than zero".to_string(),
            ));
        }
        if self.check_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "check_interval must be greater than zero".to_string(),
            ));
        }
        if self.stats_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "stats_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn check_period(&self) -> Duration {
        Duration::from_millis(self.check_interval)
    }

    pub fn stats_period(&self) -> Duration {
        Duration::from_millis(self.stats_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_memory: DEFAULT_MAX_MEMORY,
            default_ttl: DEFAULT_TTL_SECS,
            check_interval: DEFAULT_CHECK_INTERVAL_MS,
            stats_interval: DEFAULT_STATS_INTERVAL_MS,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
