//! Project aggregate and raw-record normalisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use super::ProjectId;
use crate::remote::record::{self, Timestamp};

const KNOWN_FIELDS: [&str; 6] = [
    "id",
    "name",
    "description",
    "status",
    "taskCount",
    "created_at",
];

/// Lifecycle status of a project.
///
/// Statuses the tracker does not know are kept verbatim so they survive an
/// edit round trip; they sort before every known status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    /// Work is ongoing.
    Active,
    /// Work has finished.
    Complete,
    /// Any other status string.
    Unknown(String),
}

impl ProjectStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Complete => "complete",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns the sort ordinal: active < complete, unknown is 0.
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Active => 1,
            Self::Complete => 2,
            Self::Unknown(_) => 0,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Self::Active,
            "complete" => Self::Complete,
            _ => Self::Unknown(value),
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked project.
///
/// `task_count` is a derived aggregate maintained by explicit deltas from
/// the task registry; it is never recomputed from a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    status: ProjectStatus,
    task_count: u32,
    created_at: Timestamp,
    extra: Map<String, Value>,
}

impl Project {
    /// Normalises a raw server record.
    ///
    /// Returns `None` when the identifier, name, status or creation
    /// timestamp is missing or empty. The timestamp may be a string or
    /// epoch milliseconds. A missing description becomes empty. The task
    /// count accepts integers, integral floats and numeric strings; anything
    /// else becomes zero. Fields the tracker does not model are kept for
    /// [`Self::to_record`].
    #[must_use]
    pub fn from_record(raw: &Value) -> Option<Self> {
        let id = record::field_identifier(raw, "id")?;
        let name = non_empty_str(raw, "name")?;
        let status = non_empty_str(raw, "status")?;
        let created_at = raw
            .get("created_at")
            .and_then(Timestamp::from_value)
            .filter(|timestamp| !timestamp.is_empty())?;
        let description = raw
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let task_count = raw.get("taskCount").and_then(coerce_count).unwrap_or(0);

        Some(Self {
            id: ProjectId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            status: ProjectStatus::from(status),
            task_count,
            created_at,
            extra: record::unknown_fields(raw, &KNOWN_FIELDS),
        })
    }

    /// Serialises the project as a server record, including any fields
    /// carried over from the record it was read from.
    #[must_use]
    pub fn to_record(&self) -> Value {
        record::merge_fields(
            &self.extra,
            [
                ("id", json!(self.id)),
                ("name", json!(self.name)),
                ("description", json!(self.description)),
                ("status", json!(self.status)),
                ("taskCount", json!(self.task_count)),
                ("created_at", json!(self.created_at)),
            ],
        )
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description (empty when none was given).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> &ProjectStatus {
        &self.status
    }

    /// Returns the number of live tasks referencing this project.
    #[must_use]
    pub const fn task_count(&self) -> u32 {
        self.task_count
    }

    /// Returns the creation timestamp in the form the server sent it.
    #[must_use]
    pub const fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Renames the project.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) const fn set_task_count(&mut self, count: u32) {
        self.task_count = count;
    }
}

fn non_empty_str<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn coerce_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().map_or_else(
            || number.as_f64().and_then(|float| float.to_string().parse().ok()),
            |count| u32::try_from(count).ok(),
        ),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Data for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: String,
    status: ProjectStatus,
    created_at: Option<Timestamp>,
}

impl NewProject {
    /// Creates an active project request with an empty description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::Active,
            created_at: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets an explicit creation timestamp instead of the clock's time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the optimistic local project keyed by `placeholder`.
    pub(crate) fn into_draft(self, placeholder: ProjectId, now: DateTime<Utc>) -> Project {
        Project {
            id: placeholder,
            name: self.name,
            description: self.description,
            status: self.status,
            task_count: 0,
            created_at: self
                .created_at
                .unwrap_or_else(|| Timestamp::new(now.to_rfc3339())),
            extra: Map::new(),
        }
    }
}

/// Builds the create request body for a draft; the id is left to the server.
pub(crate) fn create_body(draft: &Project) -> Value {
    json!({
        "name": draft.name,
        "description": draft.description,
        "status": draft.status,
        "taskCount": 0,
        "created_at": draft.created_at,
    })
}
