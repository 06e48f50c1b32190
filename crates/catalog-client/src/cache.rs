//! In-memory response cache with expiry.
//!
//! Entries are keyed by endpoint (path plus query string). Freshness is
//! checked on every read; stale entries stay in the map until the same key
//! is fetched again and the entry is replaced.

use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached response payload
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Value,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Response cache keyed by endpoint
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Get a cached payload if it exists and has not expired
    pub fn get(&self, key: &str, now: Instant) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                debug!(key = key, "Cache hit");
                Some(entry.payload.clone())
            }
            Some(_) => {
                debug!(key = key, "Cache entry expired");
                None
            }
            None => {
                debug!(key = key, "Cache miss");
                None
            }
        }
    }

    /// Store a payload, replacing any previous entry for the key
    pub fn insert(&mut self, key: &str, payload: Value, now: Instant) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: now,
            },
        );
        debug!(key = key, "Cache stored");
    }

    /// Raw entry access, regardless of freshness
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Get cache statistics
    pub fn stats(&self, now: Instant) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            fresh_entries: self
                .entries
                .values()
                .filter(|e| e.is_fresh(now, self.ttl))
                .count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
}
