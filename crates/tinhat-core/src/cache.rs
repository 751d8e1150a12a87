//! Time-to-live cache for scan results.
//!
//! Entries are keyed by operation identity. Each key may carry its own TTL;
//! otherwise the cache default applies. An entry is stale once
//! `now - stored_at > ttl` and is never returned after that.
//!
//! Time is read from [`tokio::time::Instant`], so tests can drive expiry
//! with a paused clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// A small map whose entries expire.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttls: HashMap<K, Duration>,
    default_ttl: Duration,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V> {
    /// Create an empty cache with a default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttls: HashMap::new(),
            default_ttl,
        }
    }

    /// Set the TTL for one key.
    #[must_use]
    pub fn with_ttl(mut self, key: K, ttl: Duration) -> Self {
        self.set_ttl(key, ttl);
        self
    }

    /// Set the TTL for one key.
    pub fn set_ttl(&mut self, key: K, ttl: Duration) {
        self.ttls.insert(key, ttl);
    }

    /// TTL in effect for a key.
    pub fn ttl(&self, key: &K) -> Duration {
        self.ttls.get(key).copied().unwrap_or(self.default_ttl)
    }

    /// The value for `key`, if present and fresh.
    pub fn get(&self, key: &K) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl(key) {
            None
        } else {
            Some(&entry.value)
        }
    }

    /// Age of the stored entry, fresh or not.
    pub fn age(&self, key: &K) -> Option<Duration> {
        self.entries.get(key).map(|e| e.stored_at.elapsed())
    }

    /// Store a value, stamped now.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop one entry. Returns `true` if something was removed.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry. Per-key TTLs are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove stale entries.
    pub fn purge_expired(&mut self) {
        let ttls = &self.ttls;
        let default_ttl = self.default_ttl;
        self.entries.retain(|key, entry| {
            let ttl = ttls.get(key).copied().unwrap_or(default_ttl);
            entry.stored_at.elapsed() <= ttl
        });
    }

    /// Number of stored entries, including stale ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
