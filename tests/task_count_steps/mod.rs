//! Step definitions for task count scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
