//! Error types for project registry operations.

use thiserror::Error;

use super::domain::ProjectId;
use crate::remote::RemoteError;

/// Errors returned by the project registry.
///
/// By the time one of these is returned the registry has already applied
/// its recovery policy; the error only reports what went wrong.
#[derive(Debug, Clone, Error)]
pub enum ProjectRegistryError {
    /// The remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The server answered with a record that fails normalisation.
    #[error("server returned a malformed project record")]
    MalformedRecord,

    /// No loaded project has the identifier.
    #[error("project not loaded: {0}")]
    UnknownProject(ProjectId),

    /// Registry state is unavailable (poisoned lock).
    #[error("project registry state unavailable: {0}")]
    State(String),
}

impl ProjectRegistryError {
    /// Wraps a lock failure.
    #[must_use]
    pub fn state(err: &impl std::fmt::Display) -> Self {
        Self::State(err.to_string())
    }
}

/// Result type for project registry operations.
pub type ProjectRegistryResult<T> = Result<T, ProjectRegistryError>;
