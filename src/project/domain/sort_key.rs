//! Comparator table for projects.

use std::cmp::Ordering;

use super::Project;
use crate::ordering::SortKey;

/// Sortable project fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectSortKey {
    /// Identifier, lexicographic.
    Id,
    /// Name, lexicographic.
    Name,
    /// Description, lexicographic.
    Description,
    /// Status by ordinal (active before complete).
    Status,
    /// Task count, numeric.
    TaskCount,
    /// Creation timestamp, chronological; unparseable values first.
    CreatedAt,
}

impl ProjectSortKey {
    /// Every key in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Name,
        Self::Description,
        Self::Status,
        Self::TaskCount,
        Self::CreatedAt,
    ];
}

impl SortKey for ProjectSortKey {
    type Entity = Project;
    const DEFAULT: Self = Self::Id;

    fn field_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Status => "status",
            Self::TaskCount => "taskCount",
            Self::CreatedAt => "created_at",
        }
    }

    fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.field_name() == name)
    }

    fn compare(self, left: &Project, right: &Project) -> Ordering {
        match self {
            Self::Id => left.id().cmp(right.id()),
            Self::Name => left.name().cmp(right.name()),
            Self::Description => left.description().cmp(right.description()),
            Self::Status => left.status().ordinal().cmp(&right.status().ordinal()),
            Self::TaskCount => left.task_count().cmp(&right.task_count()),
            Self::CreatedAt => left.created_at().cmp_chronological(right.created_at()),
        }
    }
}
