//! Domain model for projects.
//!
//! Projects arrive from the remote API as loosely typed JSON records and are
//! normalised here; malformed records never reach the registry.

mod ids;
mod project;
mod sort_key;

pub use ids::ProjectId;
pub(crate) use project::create_body;
pub use project::{NewProject, Project, ProjectStatus};
pub use sort_key::ProjectSortKey;
