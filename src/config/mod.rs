//! Configuration module
//!
//! Holds the process-wide query settings. Call [`init`] once at startup to
//! override the defaults.

mod query;

pub use query::*;

use crate::error::{QueryError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

/// Global configuration slot
static CONFIG: Lazy<RwLock<QueryConfig>> = Lazy::new(|| RwLock::new(QueryConfig::default()));

impl QueryConfig {
    /// Deserialize a config from JSON; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: QueryConfig = serde_json::from_str(text)?;
        if config.cache_enabled && config.cache_capacity == 0 {
            return Err(QueryError::InvalidConfig(
                "cache_capacity must be positive when the cache is enabled".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Install the configuration (replaces any previous one)
pub fn init(config: QueryConfig) {
    debug!(
        cache_enabled = config.cache_enabled,
        cache_capacity = config.cache_capacity,
        "installing query config"
    );
    *CONFIG.write() = config;
}

/// Snapshot of the current configuration
pub fn current() -> QueryConfig {
    CONFIG.read().clone()
}
