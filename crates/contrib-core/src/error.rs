use thiserror::Error;

/// Shown when a failure carries no description of its own.
pub const FALLBACK_MESSAGE: &str = "Unknown error";

/// Failures of the load sequence.
///
/// Display is the bare underlying message so it can be shown verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Not connected, or the grant lacks a required scope.
    #[error("{0}")]
    Authorization(String),

    /// Non-success response from either network call.
    #[error("{0}")]
    Transport(String),

    /// The GraphQL response carried an error payload.
    #[error("{0}")]
    Query(String),

    /// Cache read or write failure. Never surfaces to the view.
    #[error("{0}")]
    Storage(String),
}

impl SyncError {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Authorization(_) => "authorization",
            SyncError::Transport(_) => "transport",
            SyncError::Query(_) => "query",
            SyncError::Storage(_) => "storage",
        }
    }

    /// Message for the error view, with the generic fallback.
    pub fn user_message(&self) -> String {
        let msg = match self {
            SyncError::Authorization(m)
            | SyncError::Transport(m)
            | SyncError::Query(m)
            | SyncError::Storage(m) => m.trim(),
        };
        if msg.is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            msg.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
