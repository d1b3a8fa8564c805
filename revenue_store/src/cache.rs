//! In-process cache of derived results with per-entry expiry.
//!
//! Time is passed in by the caller so expiry can be tested without
//! sleeping.

use crate::config::StoreConfig;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// String-keyed cache whose entries expire after a time-to-live
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<V> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.cache_ttl())
    }

    /// Lifetime used when `insert` is given no explicit TTL
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value` under `key` until `now + ttl`, replacing any previous entry
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) {
        let expires_at = now + ttl.unwrap_or(self.default_ttl);
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                cached_at: now,
                expires_at,
            },
        );
    }

    /// Live value for `key`. An expired entry is evicted and reported missing.
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<&V> {
        let expired = self.entries.get(key)?.expires_at < now;
        if expired {
            self.entries.remove(key);
            debug!(key, "evicted expired cache entry");
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// When the live entry for `key` was written
    pub fn cached_at(&self, key: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.entries
            .get(key)
            .filter(|entry| entry.expires_at >= now)
            .map(|entry| entry.cached_at)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at >= now);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "purged expired cache entries");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries, expired ones included until they are evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}
