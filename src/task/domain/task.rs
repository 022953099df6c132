//! Task entity, status and due-date types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use super::TaskId;
use crate::project::domain::ProjectId;
use crate::remote::record::{self, Timestamp};

/// Workflow status of a task.
///
/// Unrecognised statuses are kept verbatim and sort before every known
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Not started.
    ToDo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
    /// Any other status string.
    Unknown(String),
}

impl TaskStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns the sort ordinal: to-do < in-progress < done, unknown is 0.
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::ToDo => 1,
            Self::InProgress => 2,
            Self::Done => 3,
            Self::Unknown(_) => 0,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "to-do" => Self::ToDo,
            "in-progress" => Self::InProgress,
            "done" => Self::Done,
            _ => Self::Unknown(value),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Due date as supplied by the API: epoch milliseconds or a date string.
pub type DueDate = Timestamp;

const KNOWN_FIELDS: [&str; 6] = ["id", "project_id", "name", "executor", "status", "due_date"];

/// A task belonging to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    name: String,
    executor: String,
    status: TaskStatus,
    due_date: DueDate,
    extra: Map<String, Value>,
}

impl Task {
    /// Coerces a raw server record.
    ///
    /// The identifier and project reference are rendered as strings whether
    /// the server sent numbers or strings. Records lacking either are
    /// rejected; other missing fields become empty. A due date that is
    /// neither a string nor an integer becomes empty. Fields the tracker
    /// does not model are kept for [`Self::to_record`].
    #[must_use]
    pub fn from_record(raw: &Value) -> Option<Self> {
        let id = record::field_identifier(raw, "id")?;
        let project_id = record::field_identifier(raw, "project_id")?;
        let text = |field: &str| {
            raw.get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        Some(Self {
            id: TaskId::new(id),
            project_id: ProjectId::new(project_id),
            name: text("name"),
            executor: text("executor"),
            status: TaskStatus::from(text("status")),
            due_date: raw
                .get("due_date")
                .and_then(Timestamp::from_value)
                .unwrap_or_default(),
            extra: record::unknown_fields(raw, &KNOWN_FIELDS),
        })
    }

    /// Serialises the task as a server record, including any fields
    /// carried over from the record it was read from.
    #[must_use]
    pub fn to_record(&self) -> Value {
        record::merge_fields(
            &self.extra,
            [
                ("id", json!(self.id)),
                ("project_id", json!(self.project_id)),
                ("name", json!(self.name)),
                ("executor", json!(self.executor)),
                ("status", json!(self.status)),
                ("due_date", json!(self.due_date)),
            ],
        )
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the owning project's identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &str {
        &self.executor
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> &DueDate {
        &self.due_date
    }

    /// Renames the task.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reassigns the task.
    #[must_use]
    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = executor.into();
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Moves the task to another project.
    #[must_use]
    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = project_id;
        self
    }

    pub(crate) fn replace_status(&mut self, status: TaskStatus) -> TaskStatus {
        std::mem::replace(&mut self.status, status)
    }
}

/// Data for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    name: String,
    executor: String,
    status: TaskStatus,
    due_date: DueDate,
}

impl NewTask {
    /// Creates a to-do task request for `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            executor: String::new(),
            status: TaskStatus::ToDo,
            due_date: DueDate::default(),
        }
    }

    /// Sets the executor.
    #[must_use]
    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = executor.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Builds the create request body; the id is left to the server.
    #[must_use]
    pub fn into_record(self) -> Value {
        json!({
            "project_id": self.project_id,
            "name": self.name,
            "executor": self.executor,
            "status": self.status,
            "due_date": self.due_date,
        })
    }
}
