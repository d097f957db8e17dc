//! In-process query cache with explicit invalidation
//!
//! Fetched resources are stored under a [`CacheKey`]. Invalidating a key
//! marks its entry stale; the event loop refetches stale entries on the next
//! tick so dependent views pick up the new data.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Scope key for a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The agent list
    Agents,
    /// A single project's details
    Project(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agents => write!(f, "agents"),
            Self::Project(id) => write!(f, "threads/project/{id}"),
        }
    }
}

/// Something that can be told a cached scope is out of date
pub trait CacheInvalidator {
    /// Mark `key` stale; fire-and-forget
    fn invalidate(&self, key: &CacheKey);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stale: bool,
    fetched_at: DateTime<Utc>,
}

/// Cache of fetched resources keyed by scope
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh value for `key`
    pub fn insert(&self, key: CacheKey, value: Value) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                stale: false,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Cached value for `key`, stale or not
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.entries.lock().get(key).map(|e| e.value.clone())
    }

    /// When `key` was last stored
    #[must_use]
    pub fn fetched_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries.lock().get(key).map(|e| e.fetched_at)
    }

    /// Whether `key` is present and marked stale
    #[must_use]
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.entries.lock().get(key).is_some_and(|e| e.stale)
    }

    /// Keys currently marked stale, in no particular order
    #[must_use]
    pub fn stale_keys(&self) -> Vec<CacheKey> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, e)| e.stale)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Drop the stale flag, keeping the cached value
    ///
    /// Called when a refetch is dispatched, so a failed fetch is not retried
    /// until the scope is invalidated again.
    pub fn clear_stale(&self, key: &CacheKey) {
        if let Some(entry) = self.entries.lock().get_mut(key) {
            entry.stale = false;
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheInvalidator for QueryCache {
    fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.stale = true;
        } else {
            // Nothing cached yet; record the key so the next tick fetches it
            entries.insert(
                key.clone(),
                CacheEntry {
                    value: Value::Null,
                    stale: true,
                    fetched_at: Utc::now(),
                },
            );
        }
        debug!(key = %key, "Invalidated cache scope");
    }
}
