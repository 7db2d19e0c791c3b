//! Offline secret cache and its storage backends

pub mod file;
pub mod memory;
pub mod offline;
pub mod storage;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use offline::OfflineCache;
pub use storage::{CacheStorage, LocalCacheStorage};
