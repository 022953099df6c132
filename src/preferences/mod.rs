//! Persistent preference storage for sort choices and manual task order.
//!
//! Preferences are plain string key/value pairs. Writes are synchronous and
//! have no failure path visible to callers; adapters that can fail log and
//! carry on with their in-memory view.

pub mod adapters;

/// Port for durable key/value preferences.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
}

/// Storage slots holding one registry's sort preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSlots {
    /// Key under which the sort field name is stored.
    pub key: &'static str,
    /// Key under which the sort direction (`1` / `-1`) is stored.
    pub order: &'static str,
}

/// Well-known preference keys.
pub mod keys {
    use super::SortSlots;

    /// Sort preference slots of the project registry.
    pub const PROJECT_SORT: SortSlots = SortSlots {
        key: "project-sort-key",
        order: "project-sort-order",
    };

    /// Sort preference slots of the task registry.
    pub const TASK_SORT: SortSlots = SortSlots {
        key: "tasks-sort-key",
        order: "tasks-sort-order",
    };

    /// Key of the persisted manual task order of one project.
    #[must_use]
    pub fn task_order(project_id: &str) -> String {
        format!("tasks-order-{project_id}")
    }
}
