//! Comparator table for tasks.

use std::cmp::Ordering;

use super::Task;
use crate::ordering::SortKey;

/// Sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSortKey {
    /// Identifier, lexicographic.
    Id,
    /// Owning project identifier, lexicographic.
    ProjectId,
    /// Name, lexicographic.
    Name,
    /// Executor, lexicographic.
    Executor,
    /// Status by ordinal (to-do, in-progress, done).
    Status,
    /// Due date by parsed timestamp; unparseable dates come first.
    DueDate,
}

impl TaskSortKey {
    /// Every key in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::ProjectId,
        Self::Name,
        Self::Executor,
        Self::Status,
        Self::DueDate,
    ];
}

impl SortKey for TaskSortKey {
    type Entity = Task;
    const DEFAULT: Self = Self::Id;

    fn field_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ProjectId => "project_id",
            Self::Name => "name",
            Self::Executor => "executor",
            Self::Status => "status",
            Self::DueDate => "due_date",
        }
    }

    fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.field_name() == name)
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::Id => left.id().cmp(right.id()),
            Self::ProjectId => left.project_id().cmp(right.project_id()),
            Self::Name => left.name().cmp(right.name()),
            Self::Executor => left.executor().cmp(right.executor()),
            Self::Status => left.status().ordinal().cmp(&right.status().ordinal()),
            Self::DueDate => left
                .due_date()
                .timestamp_millis()
                .cmp(&right.due_date().timestamp_millis()),
        }
    }
}
