//! In-memory cache store backed by moka.
//!
//! Suitable for single-process deployments and tests. Per-entry TTL is
//! implemented with moka's [`Expiry`] hook; memory use is approximated
//! by a key+value byte weigher.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::{CacheStats, CacheStore, KEY_PREFIX};

/// Configuration for the in-memory cache store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 10_000 }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }
}

#[derive(Clone)]
struct Entry {
    text: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory [`CacheStore`] on a bounded moka cache.
pub struct MemoryCacheStore {
    cache: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(PerEntryTtl)
            .weigher(|key: &String, entry: &Entry| {
                (key.len() + entry.text.len()).try_into().unwrap_or(u32::MAX)
            })
            .build();
        Self { cache }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await.map(|entry| entry.text)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.cache
            .insert(key.to_string(), Entry { text: value, ttl })
            .await;
    }

    async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        self.cache.run_pending_tasks().await;
        let matching: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();
        let removed = matching.len() as u64;
        for key in matching {
            self.cache.invalidate(&key).await;
        }
        removed
    }

    async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        let scoped_keys = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(KEY_PREFIX))
            .count() as u64;
        CacheStats {
            total_keys: self.cache.entry_count(),
            scoped_keys,
            memory_used: self.cache.weighted_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_roundtrip() {
        let store = MemoryCacheStore::default();
        store
            .set("ai:u1:chat:abc", "text".into(), Duration::from_secs(60))
            .await;
        assert_eq!(store.get("ai:u1:chat:abc").await.as_deref(), Some("text"));

        store.delete("ai:u1:chat:abc").await;
        assert_eq!(store.get("ai:u1:chat:abc").await, None);
    }

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let store = MemoryCacheStore::default();
        store
            .set("ai:u1:chat:abc", "text".into(), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.get("ai:u1:chat:abc").await, None);
    }

    #[tokio::test]
    async fn prefix_delete_removes_only_the_scope() {
        let store = MemoryCacheStore::default();
        let ttl = Duration::from_secs(60);
        store.set("ai:u1:chat:a", "1".into(), ttl).await;
        store.set("ai:u1:plan_generation:b", "2".into(), ttl).await;
        store.set("ai:u2:chat:c", "3".into(), ttl).await;

        let removed = store.delete_by_prefix("ai:u1:").await;
        assert_eq!(removed, 2);
        assert_eq!(store.get("ai:u1:chat:a").await, None);
        assert_eq!(store.get("ai:u2:chat:c").await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn stats_count_scoped_keys_and_memory() {
        let store = MemoryCacheStore::default();
        let ttl = Duration::from_secs(60);
        store.set("ai:u1:chat:a", "hello".into(), ttl).await;
        store.set("other:key", "x".into(), ttl).await;

        let stats = store.stats().await;
        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.scoped_keys, 1);
        assert!(stats.memory_used > 0);
    }
}
