//! Port contracts for the project context.

use async_trait::async_trait;

use crate::project::domain::ProjectId;
use crate::project::error::ProjectRegistryResult;

/// Narrow mutation interface for the per-project task count.
///
/// The task registry holds one of these instead of the project registry
/// itself, so it can move the counter but never touch the project list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCountLedger: Send + Sync {
    /// Adds `delta` to the task count of `project_id`, clamped at zero.
    ///
    /// Unknown projects are ignored. If the change cannot be persisted it is
    /// compensated before this returns.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure after compensation.
    async fn adjust_task_count(&self, project_id: &ProjectId, delta: i64)
    -> ProjectRegistryResult<()>;
}
