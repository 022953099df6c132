//! Service layer for the project registry.

mod registry;

pub use registry::ProjectRegistry;
