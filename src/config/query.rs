//! Query engine configuration structures

use serde::{Deserialize, Serialize};

/// Settings for query compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Reuse compiled ASTs across predicate calls
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Number of distinct queries kept before the cache is cleared
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    2048
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            cache_capacity: default_cache_capacity(),
        }
    }
}
