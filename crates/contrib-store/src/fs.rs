use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use contrib_core::CacheEntry;
use fs2::FileExt;
use tracing::debug;

use crate::{CacheStore, StoreError};

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::NoParent(path.to_path_buf()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> Result<LockGuard, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive().map_err(|source| StoreError::Lock {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LockGuard { _file: file })
}

/// One JSON file per key under a root directory.
///
/// File names are `blake3(key)` so arbitrary keys map to safe names.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data_dir>/contrib-graph/cache`, falling back to the home directory.
    pub fn default_root() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("contrib-graph").join("cache")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".contrib-graph").join("cache")
        } else {
            PathBuf::from(".contrib-graph-cache")
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes());
        self.root.join(format!("{}.json", &hash.to_hex()[..32]))
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }
}

fn read_entry(path: &Path, key: &str) -> Result<Option<CacheEntry>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(target: "contrib::store", key, "no cached entry");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let entry = serde_json::from_slice(&bytes)?;
    Ok(Some(entry))
}

/// File reads, the lock and the atomic rename all block, so both calls run
/// on the blocking pool.
#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let path = self.path_for(key);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || read_entry(&path, &key)).await?
    }

    async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(entry)?;
        let lock_path = self.lock_path();
        let path = self.path_for(key);
        let len = data.len();
        tokio::task::spawn_blocking(move || {
            let _guard = lock_file(&lock_path)?;
            write_atomic(&path, &data)
        })
        .await??;
        debug!(target: "contrib::store", key, bytes = len, "cache entry written");
        Ok(())
    }
}
