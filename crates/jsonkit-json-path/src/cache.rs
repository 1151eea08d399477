//! Bounded parse cache for repeated queries.

use crate::parser::{JsonPathParser, ParseError};
use crate::types::JSONPath;
use indexmap::IndexMap;
use std::sync::Arc;

/// Capacity used by [`QueryCache::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Caller-owned cache from expression text to its parsed AST.
///
/// Entries are kept in recency order. When the cache is full, the least
/// recently used expression is evicted. A capacity of zero disables caching.
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: IndexMap<String, Arc<JSONPath>>,
    capacity: usize,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
            capacity,
        }
    }

    /// Return the parsed form of `expression`, parsing it on a miss.
    ///
    /// Parse failures are not cached.
    pub fn get_or_parse(&mut self, expression: &str) -> Result<Arc<JSONPath>, ParseError> {
        if let Some(path) = self.entries.shift_remove(expression) {
            tracing::trace!(expression, "jsonpath cache hit");
            self.entries.insert(expression.to_string(), Arc::clone(&path));
            return Ok(path);
        }

        let path = Arc::new(JsonPathParser::parse(expression)?);
        if self.capacity == 0 {
            return Ok(path);
        }
        if self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                tracing::debug!(expression = %evicted, "jsonpath cache evicted");
            }
        }
        self.entries.insert(expression.to_string(), Arc::clone(&path));
        Ok(path)
    }

    pub fn contains(&self, expression: &str) -> bool {
        self.entries.contains_key(expression)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
