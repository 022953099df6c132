//! Application services for task tracking.

mod registry;

pub use registry::TaskRegistry;
