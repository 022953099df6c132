//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use trackboard::preferences::PreferenceStore;
use trackboard::preferences::adapters::InMemoryPreferenceStore;
use trackboard::project::domain::ProjectId;
use trackboard::project::services::ProjectRegistry;
use trackboard::remote::Resource;
use trackboard::remote::adapters::memory::InMemoryRemoteCollection;
use trackboard::task::services::TaskRegistry;

/// Project registry type used by the integration tests.
pub type Projects = ProjectRegistry<InMemoryRemoteCollection, dyn PreferenceStore, DefaultClock>;

/// Task registry type used by the integration tests.
pub type Tasks = TaskRegistry<InMemoryRemoteCollection, dyn PreferenceStore, Projects>;

/// Both registries wired to one remote and one preference store.
pub struct Board {
    pub remote: InMemoryRemoteCollection,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
}

impl Board {
    /// Wires registries over `remote` and `preferences`.
    pub fn new(remote: InMemoryRemoteCollection, preferences: Arc<dyn PreferenceStore>) -> Self {
        let projects = Arc::new(ProjectRegistry::new(
            Arc::new(remote.clone()),
            Arc::clone(&preferences),
            Arc::new(DefaultClock),
        ));
        let tasks = Arc::new(TaskRegistry::new(
            Arc::new(remote.clone()),
            preferences,
            Arc::clone(&projects),
        ));
        Self {
            remote,
            projects,
            tasks,
        }
    }

    /// Returns the locally held task count of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is not loaded.
    pub fn local_count(&self, project_id: &str) -> Result<u32, eyre::Report> {
        self.projects
            .get(&ProjectId::new(project_id))?
            .map(|project| project.task_count())
            .ok_or_else(|| eyre::eyre!("project {project_id} not loaded"))
    }

    /// Returns the server-side task count of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is not stored remotely.
    pub fn stored_count(&self, project_id: &str) -> Result<u64, eyre::Report> {
        self.remote
            .records(Resource::Projects)?
            .into_iter()
            .find(|stored| stored.get("id") == Some(&json!(project_id)))
            .and_then(|stored| stored.get("taskCount").and_then(Value::as_u64))
            .ok_or_else(|| eyre::eyre!("project {project_id} not stored"))
    }

    /// Returns the ids of the loaded tasks in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if registry state is unavailable.
    pub fn task_ids(&self) -> Result<Vec<String>, eyre::Report> {
        Ok(self
            .tasks
            .tasks()?
            .iter()
            .map(|task| task.id().to_string())
            .collect())
    }
}

/// Builds a project record as the API stores it.
pub fn project_record(id: &str, name: &str, task_count: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "status": "active",
        "taskCount": task_count,
        "created_at": "2024-02-01T10:00:00Z",
    })
}

/// Builds a task record as the API stores it.
pub fn task_record(id: u64, project_id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "project_id": project_id,
        "name": name,
        "executor": "",
        "status": "to-do",
        "due_date": "",
    })
}

/// Seeds a remote with project "1" holding tasks 11-13 and an empty
/// project "2".
///
/// # Errors
///
/// Returns an error if seeding fails.
pub fn seeded_remote() -> Result<InMemoryRemoteCollection, eyre::Report> {
    let remote = InMemoryRemoteCollection::new();
    remote.seed(
        Resource::Projects,
        [project_record("1", "Alpha", 3), project_record("2", "Beta", 0)],
    )?;
    remote.seed(
        Resource::Tasks,
        [
            task_record(11, "1", "Design"),
            task_record(12, "1", "Build"),
            task_record(13, "1", "Test"),
        ],
    )?;
    Ok(remote)
}

/// Provides a board over the seeded remote and fresh preferences.
#[fixture]
pub fn board() -> Board {
    let remote = seeded_remote().expect("seeding should succeed");
    Board::new(remote, Arc::new(InMemoryPreferenceStore::new()))
}
