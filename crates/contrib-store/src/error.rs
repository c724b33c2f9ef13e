use std::path::PathBuf;

use contrib_core::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no parent dir for {}", .0.display())]
    NoParent(PathBuf),

    #[error("failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Raised by test stores on demand.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<tempfile::PersistError> for StoreError {
    fn from(e: tempfile::PersistError) -> Self {
        StoreError::Io(e.error)
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Storage(e.to_string())
    }
}
