//! Port contract for CRUD access to remote collections.

use super::ResourcePath;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote collection calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Generic CRUD client for the tracker API.
///
/// Records travel as raw JSON; normalising them into domain values is the
/// caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
    /// Reads every record at `path` (honouring its filter, if any).
    async fn get(&self, path: &ResourcePath) -> RemoteResult<Vec<Value>>;

    /// Creates a record and returns the server's representation of it.
    async fn post(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value>;

    /// Replaces the record at `path`.
    async fn put(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value>;

    /// Merges `body` into the record at `path`.
    async fn patch(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value>;

    /// Removes the record at `path`.
    async fn delete(&self, path: &ResourcePath) -> RemoteResult<()>;
}

/// Errors returned by remote collection clients.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The addressed record does not exist.
    #[error("remote record not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {code} for {path}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Request path.
        path: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a response decoding failure.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// Returns `true` when repeating the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => *code >= 500,
            Self::NotFound(_) | Self::Decode(_) => false,
        }
    }
}
