//! Ordering engine shared by the project and task registries.
//!
//! Everything here is pure: sorting by a typed comparator table, merging a
//! persisted manual order into freshly fetched records, and resolving a
//! drag-and-drop gesture into a new id sequence.

mod manual;
mod sort;

pub use manual::{merge_manual_order, resolve_drop};
pub use sort::{ParseSortError, SortDirection, SortKey, SortPreference, stable_sort};
