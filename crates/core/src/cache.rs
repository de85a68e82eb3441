//! Time-bounded in-memory cache.
//!
//! Entries are never swept in the background: a stale entry is simply
//! skipped on read and reclaimed when capacity pressure forces an
//! eviction. The capacity bound keeps long-running processes from
//! growing without limit.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

/// A concurrent key-value cache with optional TTL and a max-entries bound.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Option<Duration>,
    max_entries: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache. `ttl = None` means entries never expire.
    pub fn new(ttl: Option<Duration>, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Look up a key, serving only entries whose expiry is strictly in
    /// the future.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now()).await
    }

    /// Look up a key relative to an explicit instant (tests control time
    /// through this).
    pub async fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        match entry.expires_at {
            Some(expires_at) if expires_at <= now => None,
            _ => Some(entry.value.clone()),
        }
    }

    /// Insert a value, stamping it with the configured TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Utc::now()).await;
    }

    /// Insert a value relative to an explicit instant.
    pub async fn insert_at(&self, key: K, value: V, now: DateTime<Utc>) {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, e| match e.expires_at {
                Some(expires_at) => expires_at > now,
                None => true,
            });

            // Still full after dropping stale entries: evict the oldest.
            if entries.len() >= self.max_entries {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                expires_at: self.ttl.map(|ttl| now + ttl),
            },
        );
    }

    /// Number of entries currently stored, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
