//! In-memory key/value cache with a fixed time-to-live per entry.

use std::{borrow::Borrow, collections::HashMap, hash::Hash, sync::Arc, time::Duration};

use tokio::{sync::RwLock, time::Instant};
use tracing::{debug, trace};

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Read-mostly cache shared by concurrent fetch tasks.
///
/// Expired entries read as absent and are only dropped by [`TtlCache::purge_expired`].
/// A live entry is never replaced, so a value seen by one reader stays the value
/// every other reader sees until it expires.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let hit = entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone());

        trace!(cache = self.name, hit = hit.is_some(), "🗃️ lookup");
        hit
    }

    /// Store `value` unless a live entry already exists for `key`.
    /// Returns whether the value was written.
    pub async fn insert(&self, key: K, value: V) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.get(&key).is_some_and(|entry| entry.is_live(now)) {
            return false;
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
        true
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(cache = self.name, removed, "🗃️ Purged expired entries");
        }
        removed
    }

    pub async fn sweep_loop(self: Arc<Self>, every: Duration) {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            self.purge_expired().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(24 * 60 * 60);

    #[tokio::test(start_paused = true)]
    async fn value_is_returned_until_expiry() {
        let cache = TtlCache::new("test", TTL);
        assert!(cache.insert("summoner".to_string(), 45).await);

        assert_eq!(cache.get("summoner").await, Some(45));

        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        assert_eq!(cache.get("summoner").await, Some(45));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("summoner").await, None);
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let cache: TtlCache<String, u32> = TtlCache::new("test", TTL);
        assert_eq!(cache.get("nobody").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn live_entry_is_not_overwritten() {
        let cache = TtlCache::new("test", TTL);
        assert!(cache.insert("k".to_string(), "first").await);
        assert!(!cache.insert("k".to_string(), "second").await);
        assert_eq!(cache.get("k").await, Some("first"));

        tokio::time::advance(TTL).await;
        assert!(cache.insert("k".to_string(), "second").await);
        assert_eq!(cache.get("k").await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_removes_only_expired_entries() {
        let cache = TtlCache::new("test", Duration::from_secs(10));
        cache.insert("old".to_string(), 1).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.insert("new".to_string(), 2).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("new").await, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_and_readers_stay_consistent() {
        const WRITERS: usize = 32;
        const READERS: usize = 16;

        let cache = Arc::new(TtlCache::new("test", TTL));
        let mut handles = Vec::new();

        for i in 0..WRITERS {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                assert!(cache.insert(format!("key-{i}"), i).await);
            }));
        }
        for _ in 0..READERS {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..WRITERS {
                    if let Some(v) = cache.get(&format!("key-{i}")).await {
                        assert_eq!(v, i);
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len().await, WRITERS);
        for i in 0..WRITERS {
            assert_eq!(cache.get(&format!("key-{i}")).await, Some(i));
        }
    }
}
