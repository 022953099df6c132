//! Task tracking.
//!
//! Tasks belong to a project by identifier. The registry keeps the loaded
//! tasks in display order, applies the persisted manual order of a project
//! and reports task creation and removal to the project task counts. The
//! module follows the same hexagonal split as the project module:
//!
//! - Domain types in [`domain`]
//! - Registry service in [`services`]

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;
