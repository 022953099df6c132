//! Optimistic mutation with compensation.

use std::future::Future;

use super::RetryPolicy;
use crate::remote::{RemoteError, RemoteResult};

/// One optimistic mutation: local change, remote confirmation, rollback.
///
/// `apply` mutates local state and returns an undo token. The remote call
/// is then attempted under the [`RetryPolicy`]; if it finally fails, the
/// token is handed to `compensate` and the remote error is returned.
#[derive(Debug, Clone, Copy)]
pub struct UnitOfWork<'a> {
    operation: &'static str,
    policy: &'a RetryPolicy,
}

impl<'a> UnitOfWork<'a> {
    /// Names a unit of work for logging and binds its retry policy.
    #[must_use]
    pub const fn new(operation: &'static str, policy: &'a RetryPolicy) -> Self {
        Self { operation, policy }
    }

    /// Runs the unit.
    ///
    /// `remote` receives the undo token so requests can be built from the
    /// state `apply` produced.
    ///
    /// # Errors
    ///
    /// Returns errors from `apply` (nothing else runs), or the final remote
    /// error after `compensate` has run. A failing compensation replaces the
    /// remote error.
    pub async fn run<U, T, E, Fut>(
        self,
        apply: impl FnOnce() -> Result<U, E>,
        mut remote: impl FnMut(&U) -> Fut,
        compensate: impl FnOnce(U) -> Result<(), E>,
    ) -> Result<T, E>
    where
        E: From<RemoteError>,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let undo = apply()?;
        match self.policy.run(self.operation, || remote(&undo)).await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    operation = self.operation,
                    error = %err,
                    "remote call failed; compensating local change"
                );
                compensate(undo)?;
                Err(err.into())
            }
        }
    }
}
