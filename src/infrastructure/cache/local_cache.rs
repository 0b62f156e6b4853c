//! In-process TTL cache for remote store hits.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::entities::RedirectEntry;

#[derive(Debug, Clone)]
struct CacheEntry {
    entry: RedirectEntry,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Memo cache from resolution key to [`RedirectEntry`] with absolute expiry.
///
/// An entry set with TTL `T` is returned for reads strictly before `T` has
/// elapsed and treated as absent from then on. Expired entries are dropped
/// lazily on read, or eagerly by [`LocalCache::purge_expired`].
///
/// There is no de-duplication of concurrent misses: racing callers may each
/// fetch remotely and each call [`LocalCache::set`]; the last writer wins.
#[derive(Debug, Default)]
pub struct LocalCache {
    entries: DashMap<String, CacheEntry>,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<RedirectEntry> {
        let now = Instant::now();
        {
            let cached = self.entries.get(key)?;
            if cached.is_live(now) {
                return Some(cached.entry.clone());
            }
        }

        // A concurrent set may have refreshed the key since the read above.
        self.entries.remove_if(key, |_, cached| !cached.is_live(now));
        debug!("Local cache EXPIRED: {}", key);
        None
    }

    /// Stores `entry` under `key` until `now + ttl`, replacing any prior entry.
    pub fn set(&self, key: impl Into<String>, entry: RedirectEntry, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(key.into(), CacheEntry { entry, expires_at });
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, cached| cached.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(15);

    #[tokio::test(start_paused = true)]
    async fn test_get_missing_key() {
        let cache = LocalCache::new();
        assert_eq!(cache.get("ua:/foo"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_live_before_ttl_and_absent_at_ttl() {
        let cache = LocalCache::new();
        cache.set("ua:/baz", RedirectEntry::internal("/baz"), TTL);

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert_eq!(cache.get("ua:/baz"), Some(RedirectEntry::internal("/baz")));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("ua:/baz"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_evicted_on_read() {
        let cache = LocalCache::new();
        cache.set("ua:/baz", RedirectEntry::internal("/baz"), TTL);
        assert_eq!(cache.len(), 1);

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get("ua:/baz"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_entry_and_expiry() {
        let cache = LocalCache::new();
        cache.set("ua:/baz", RedirectEntry::internal("/old"), TTL);

        tokio::time::advance(Duration::from_secs(10)).await;
        cache.set("ua:/baz", RedirectEntry::external("https://new.example/"), TTL);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(
            cache.get("ua:/baz"),
            Some(RedirectEntry::external("https://new.example/"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = LocalCache::new();
        cache.set("ua:/short", RedirectEntry::internal("/a"), Duration::from_secs(1));
        cache.set("ua:/long", RedirectEntry::internal("/b"), Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("ua:/long").is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_set_and_get() {
        let cache = Arc::new(LocalCache::new());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..500 {
                    let target = format!("/target/{i}");
                    cache.set("ua:/shared", RedirectEntry::internal(target), TTL);
                    let entry = cache.get("ua:/shared").unwrap();
                    assert!(entry.target.starts_with("/target/"));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cache.len(), 1);
    }
}
