//! Error types for task registry operations.

use thiserror::Error;

use super::domain::TaskId;
use crate::remote::RemoteError;

/// Errors returned by the task registry.
///
/// Local state has already been rolled back (or kept) per operation before
/// one of these is returned.
#[derive(Debug, Clone, Error)]
pub enum TaskRegistryError {
    /// The remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The server answered with a record lacking an id or project reference.
    #[error("server returned a malformed task record")]
    MalformedRecord,

    /// No loaded task has the identifier.
    #[error("task not loaded: {0}")]
    UnknownTask(TaskId),

    /// Registry state is unavailable (poisoned lock).
    #[error("task registry state unavailable: {0}")]
    State(String),
}

impl TaskRegistryError {
    /// Wraps a lock failure.
    #[must_use]
    pub fn state(err: &impl std::fmt::Display) -> Self {
        Self::State(err.to_string())
    }
}

/// Result type for task registry operations.
pub type TaskRegistryResult<T> = Result<T, TaskRegistryError>;
