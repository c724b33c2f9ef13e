//! Persistence for the cached contribution snapshot.
//!
//! The controller talks to a [`CacheStore`]; the binary uses [`FileStore`]
//! and tests use [`MemoryStore`].

pub mod error;
pub mod fs;
pub mod memory;

use async_trait::async_trait;
use contrib_core::CacheEntry;

pub use error::StoreError;
pub use fs::{lock_file, write_atomic, FileStore, LockGuard};
pub use memory::MemoryStore;

/// Key-value storage for [`CacheEntry`] snapshots.
///
/// `set` replaces the stored value wholesale. A failed `set` must leave the
/// previous value readable.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;
    async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError>;
}
