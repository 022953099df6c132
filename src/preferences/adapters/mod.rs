//! Preference store adapters.
//!
//! - [`InMemoryPreferenceStore`]: process-lifetime storage for tests
//! - [`JsonFilePreferenceStore`]: one JSON document on disk

mod file;
mod memory;

pub use file::{JsonFilePreferenceStore, PreferenceStoreError};
pub use memory::InMemoryPreferenceStore;
