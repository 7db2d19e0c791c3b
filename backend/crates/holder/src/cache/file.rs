//! File-backed storage: one file per key in a directory
//!
//! File names are the hex encoding of the key, so any key text is safe.

use crate::cache::storage::CacheStorage;
use crate::error::{StorageError, StorageResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "entry";

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStorage {
    /// Use `dir`, creating it if needed
    pub async fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            quota_bytes: None,
        })
    }

    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", platform::crypto::to_hex(key.as_bytes()), EXTENSION))
    }

    fn key_for(path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = platform::crypto::from_hex(stem).ok()?;
        String::from_utf8(bytes).ok()
    }

    async fn used_bytes_excluding(&self, skip: &Path) -> StorageResult<u64> {
        let mut total = 0;
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if entry.path() == skip {
                continue;
            }
            total += entry.metadata().await?.len();
        }
        Ok(total)
    }
}

impl CacheStorage for FileStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes_excluding(&path).await?;
            if used + value.len() as u64 > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }

        // Write then rename so readers never see a partial entry
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if let Some(key) = Self::key_for(&entry.path()) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
