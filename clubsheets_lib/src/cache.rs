//! In-memory cache with per-entry TTL, backed by `DashMap` for concurrent access.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::source::Rows;

/// Longest lifetime an entry can get; longer TTLs are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A single cached value with its expiration time.
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe key/value store where every entry carries its own TTL.
///
/// There is no capacity eviction. Expired entries are lazily removed on the
/// next `get` for that key, or overwritten by the next `put`. Each `get` and
/// `put` is atomic on its own; nothing orders a `get` against a later `put`.
pub struct RangeCache<V = Arc<Rows>> {
    store: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> RangeCache<V> {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the cached value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.store.get(key)?;
        if Instant::now() >= entry.expires_at {
            drop(entry);
            self.store
                .remove_if(key, |_, e| Instant::now() >= e.expires_at);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Inserts or overwrites an entry that expires `ttl` from now, or
    /// [`MAX_TTL`] from now if `ttl` is longer.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .or_else(|| now.checked_add(Duration::from_secs(u32::MAX as u64)))
            .unwrap_or(now);
        self.store.insert(
            key.into(),
            CacheEntry { value, expires_at },
        );
    }

    /// Time left before `key` expires, if it is present and live.
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let entry = self.store.get(key)?;
        entry.expires_at.checked_duration_since(Instant::now())
    }

    /// Drops one entry so the next read misses.
    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Number of stored entries, expired ones included until they are touched.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<V: Clone> Default for RangeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
