//! Offline cache
//!
//! JSON entries `{data, timestamp, expiresAt}` stored under a versioned key
//! prefix. An entry is dropped on read once it passes its absolute expiry or
//! the reader's max age, whichever comes first.

use crate::cache::storage::CacheStorage;
use crate::error::{StorageError, StorageResult};
use platform::clock::Clock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const CACHE_PREFIX: &str = "myticket_cache_";
pub const CACHE_VERSION: &str = "v1";

/// Share of entries evicted when storage is full
const EVICT_FRACTION: f64 = 0.2;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    data: T,
    timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
}

/// Only the write time, for eviction ordering
#[derive(Deserialize)]
struct EntryStamp {
    timestamp: i64,
}

pub struct OfflineCache<S> {
    storage: S,
    clock: Arc<dyn Clock>,
}

impl<S> OfflineCache<S>
where
    S: CacheStorage + Sync,
{
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn storage_key(key: &str) -> String {
        format!("{CACHE_PREFIX}{CACHE_VERSION}_{key}")
    }

    /// Cached value, or `None` if absent, stale or unreadable
    pub async fn get<T: DeserializeOwned>(&self, key: &str, max_age: Option<Duration>) -> Option<T> {
        let storage_key = Self::storage_key(key);
        let raw = match self.storage.read(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Offline cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "Dropping unreadable cache entry");
                self.discard(&storage_key).await;
                return None;
            }
        };

        let now = self.clock.now_ms();
        let expired = entry.expires_at.is_some_and(|at| now >= at);
        let too_old = max_age.is_some_and(|age| now.saturating_sub(entry.timestamp) > age.as_millis() as i64);
        if expired || too_old {
            tracing::debug!(key, expired, too_old, "Cache entry is stale");
            self.discard(&storage_key).await;
            return None;
        }

        Some(entry.data)
    }

    /// Store `value`. When storage is full the oldest fifth of the namespace is
    /// evicted and the error returned; the write is not retried.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> StorageResult<()> {
        let now = self.clock.now_ms();
        let entry = CacheEntry {
            data: value,
            timestamp: now,
            expires_at: ttl.map(|ttl| now.saturating_add(ttl.as_millis() as i64)),
        };
        let raw = serde_json::to_string(&entry).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        match self.storage.write(&Self::storage_key(key), &raw).await {
            Err(StorageError::QuotaExceeded) => {
                tracing::warn!(key, "Offline cache full; evicting oldest entries");
                self.evict_oldest().await?;
                Err(StorageError::QuotaExceeded)
            }
            other => other,
        }
    }

    pub async fn clear(&self, key: &str) -> StorageResult<()> {
        self.storage.remove(&Self::storage_key(key)).await
    }

    /// Remove every entry of the namespace, all versions included
    pub async fn clear_all(&self) -> StorageResult<()> {
        for key in self.namespace_keys().await? {
            self.storage.remove(&key).await?;
        }
        Ok(())
    }

    /// Approximate footprint: key plus value length of every entry
    pub async fn size(&self) -> StorageResult<usize> {
        let mut size = 0;
        for key in self.namespace_keys().await? {
            if let Some(value) = self.storage.read(&key).await? {
                size += key.len() + value.len();
            }
        }
        Ok(size)
    }

    async fn namespace_keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = self.storage.keys().await?;
        keys.retain(|k| k.starts_with(CACHE_PREFIX));
        Ok(keys)
    }

    async fn discard(&self, storage_key: &str) {
        if let Err(e) = self.storage.remove(storage_key).await {
            tracing::warn!(key = storage_key, error = %e, "Failed to remove cache entry");
        }
    }

    async fn evict_oldest(&self) -> StorageResult<usize> {
        let mut stamped = Vec::new();
        for key in self.namespace_keys().await? {
            let Some(raw) = self.storage.read(&key).await? else {
                continue;
            };
            match serde_json::from_str::<EntryStamp>(&raw) {
                Ok(stamp) => stamped.push((stamp.timestamp, key)),
                // Unreadable entries go regardless
                Err(_) => self.storage.remove(&key).await?,
            }
        }

        stamped.sort();
        let count = (stamped.len() as f64 * EVICT_FRACTION).floor() as usize;
        for (_, key) in stamped.iter().take(count) {
            self.storage.remove(key).await?;
        }

        tracing::info!(evicted = count, "Offline cache eviction");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryStorage;
    use crate::cache::storage::CacheStorage;
    use platform::clock::ManualClock;

    fn cache(clock: &ManualClock, storage: MemoryStorage) -> OfflineCache<MemoryStorage> {
        OfflineCache::new(storage, Arc::new(clock.clone()))
    }

    #[tokio::test]
    async fn test_versioned_key_and_entry_shape() {
        let clock = ManualClock::new(1_000);
        let storage = MemoryStorage::new();
        let cache = cache(&clock, storage.clone());

        cache
            .set("qr_secret", &"c2VjcmV0", Some(Duration::from_millis(500)))
            .await
            .unwrap();

        let raw = storage
            .read("myticket_cache_v1_qr_secret")
            .await
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["data"], "c2VjcmV0");
        assert_eq!(json["timestamp"], 1_000);
        assert_eq!(json["expiresAt"], 1_500);
    }

    #[tokio::test]
    async fn test_absolute_expiry() {
        let clock = ManualClock::new(1_000);
        let cache = cache(&clock, MemoryStorage::new());
        cache
            .set("k", &42u32, Some(Duration::from_millis(500)))
            .await
            .unwrap();

        clock.set(1_499);
        assert_eq!(cache.get::<u32>("k", None).await, Some(42));
        clock.set(1_500);
        assert_eq!(cache.get::<u32>("k", None).await, None);
        // Stale entries are removed on read
        assert_eq!(cache.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_max_age_applies_without_ttl() {
        let clock = ManualClock::new(0);
        let cache = cache(&clock, MemoryStorage::new());
        cache.set("k", &"v", None).await.unwrap();

        clock.set(10_000);
        let fresh: Option<String> = cache.get("k", Some(Duration::from_secs(10))).await;
        assert_eq!(fresh.as_deref(), Some("v"));
        // A looser reader still sees it before the strict one deletes it
        assert!(cache.get::<String>("k", None).await.is_some());

        clock.set(10_001);
        assert!(cache.get::<String>("k", Some(Duration::from_secs(10))).await.is_none());
        assert!(cache.get::<String>("k", None).await.is_none());
    }

    #[tokio::test]
    async fn test_whichever_bound_is_tighter_wins() {
        let clock = ManualClock::new(0);
        let cache = cache(&clock, MemoryStorage::new());
        cache
            .set("k", &1u8, Some(Duration::from_secs(100)))
            .await
            .unwrap();

        clock.set(5_001);
        assert!(cache.get::<u8>("k", Some(Duration::from_secs(5))).await.is_none());
    }

    #[tokio::test]
    async fn test_quota_evicts_oldest_fifth() {
        let clock = ManualClock::new(0);
        let storage = MemoryStorage::with_quota(1_000);
        let cache = cache(&clock, storage.clone());

        for i in 0..10 {
            clock.set(i * 10);
            cache.set(&format!("entry{i}"), &"x".repeat(40), None).await.unwrap();
        }

        clock.set(1_000);
        let err = cache
            .set("big", &"y".repeat(600), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded));

        // Not retried
        assert!(cache.get::<String>("big", None).await.is_none());
        // Two oldest of ten removed
        assert!(cache.get::<String>("entry0", None).await.is_none());
        assert!(cache.get::<String>("entry1", None).await.is_none());
        assert!(cache.get::<String>("entry2", None).await.is_some());
        assert_eq!(storage.keys().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_clear_and_clear_all_leave_foreign_keys() {
        let clock = ManualClock::new(0);
        let storage = MemoryStorage::new();
        storage.write("unrelated", "keep").await.unwrap();
        storage
            .write("myticket_cache_v0_legacy", "{\"data\":1,\"timestamp\":0}")
            .await
            .unwrap();
        let cache = cache(&clock, storage.clone());

        cache.set("a", &1, None).await.unwrap();
        cache.set("b", &2, None).await.unwrap();
        cache.clear("a").await.unwrap();
        assert!(cache.get::<i32>("a", None).await.is_none());
        assert_eq!(cache.get::<i32>("b", None).await, Some(2));
        assert!(cache.size().await.unwrap() > 0);

        cache.clear_all().await.unwrap();
        assert_eq!(cache.size().await.unwrap(), 0);
        assert_eq!(storage.keys().await.unwrap(), vec!["unrelated".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_dropped() {
        let clock = ManualClock::new(0);
        let storage = MemoryStorage::new();
        storage.write("myticket_cache_v1_k", "not json").await.unwrap();
        let cache = cache(&clock, storage.clone());

        assert!(cache.get::<String>("k", None).await.is_none());
        assert!(storage.read("myticket_cache_v1_k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_absurd_timestamp_counts_as_stale() {
        let clock = ManualClock::new(1_000);
        let storage = MemoryStorage::new();
        let raw = format!(r#"{{"data":"s","timestamp":{}}}"#, i64::MIN);
        storage.write("myticket_cache_v1_k", &raw).await.unwrap();
        let cache = cache(&clock, storage.clone());

        let max_age = Some(Duration::from_secs(60));
        assert!(cache.get::<String>("k", max_age).await.is_none());
        assert!(storage.read("myticket_cache_v1_k").await.unwrap().is_none());
    }
}
