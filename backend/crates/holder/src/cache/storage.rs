//! Durable key/value storage under the offline cache

use crate::error::StorageResult;

/// String key/value store that survives restarts
///
/// Writes fail with `StorageError::QuotaExceeded` when the store is full;
/// the caller decides what to evict.
#[trait_variant::make(CacheStorage: Send)]
pub trait LocalCacheStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>>;

    async fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Every key currently stored
    async fn keys(&self) -> StorageResult<Vec<String>>;
}
