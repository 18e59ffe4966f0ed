//! Compiled query cache - Optimized with faster hashing

use crate::config;
use crate::error::Result;
use crate::query::ast::AstNode;
use crate::query::parser;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Global query cache with fast hashing (ahash)
static QUERY_CACHE: Lazy<RwLock<QueryCache>> =
    Lazy::new(|| RwLock::new(QueryCache::with_capacity(config::current().cache_capacity)));

/// Bounded map from query text to its AST
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: AHashMap<String, Arc<AstNode>>,
}

impl QueryCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: AHashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn get(&self, source: &str) -> Option<Arc<AstNode>> {
        self.entries.get(source).cloned()
    }

    /// Insert a compiled query, clearing the table first once it holds
    /// `capacity` entries
    pub fn insert(&mut self, source: &str, ast: Arc<AstNode>, capacity: usize) {
        if self.entries.len() >= capacity && !self.entries.contains_key(source) {
            debug!(entries = self.entries.len(), "query cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(source.to_string(), ast);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Get or parse a query string, using the cache for repeated queries
#[inline]
pub fn get_or_parse(source: &str) -> Result<Arc<AstNode>> {
    // Fast path: check read lock first
    if let Some(ast) = QUERY_CACHE.read().get(source) {
        return Ok(ast);
    }

    // Slow path: parse and cache
    let ast = Arc::new(parser::parse(source)?);
    debug!(query = source, "compiled query");

    let capacity = config::current().cache_capacity.max(1);
    QUERY_CACHE.write().insert(source, Arc::clone(&ast), capacity);

    Ok(ast)
}

/// Compile a query, through the cache when it is enabled
pub fn compile(source: &str) -> Result<Arc<AstNode>> {
    if config::current().cache_enabled {
        get_or_parse(source)
    } else {
        parser::parse(source).map(Arc::new)
    }
}

/// Clear the global cache
pub fn clear_cache() {
    QUERY_CACHE.write().clear();
}

/// Number of queries currently cached
pub fn cache_size() -> usize {
    QUERY_CACHE.read().len()
}
