//! Shared world state for task count BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trackboard::preferences::adapters::InMemoryPreferenceStore;
use trackboard::project::domain::ProjectId;
use trackboard::project::services::ProjectRegistry;
use trackboard::remote::adapters::memory::InMemoryRemoteCollection;
use trackboard::task::domain::TaskId;
use trackboard::task::error::TaskRegistryError;
use trackboard::task::services::TaskRegistry;

/// Project registry type used by the BDD world.
pub type TestProjects =
    ProjectRegistry<InMemoryRemoteCollection, InMemoryPreferenceStore, DefaultClock>;

/// Task registry type used by the BDD world.
pub type TestTasks = TaskRegistry<InMemoryRemoteCollection, InMemoryPreferenceStore, TestProjects>;

/// Scenario world for task count behaviour tests.
pub struct TaskCountWorld {
    pub remote: InMemoryRemoteCollection,
    pub preferences: InMemoryPreferenceStore,
    pub projects: Arc<TestProjects>,
    pub tasks: TestTasks,
    pub project_id: Option<ProjectId>,
    pub task_names: HashMap<String, TaskId>,
    pub last_delete_result: Option<Result<(), TaskRegistryError>>,
}

impl TaskCountWorld {
    /// Creates a world over an empty remote.
    #[must_use]
    pub fn new() -> Self {
        let remote = InMemoryRemoteCollection::new();
        let preferences = InMemoryPreferenceStore::new();
        let projects = Arc::new(ProjectRegistry::new(
            Arc::new(remote.clone()),
            Arc::new(preferences.clone()),
            Arc::new(DefaultClock),
        ));
        let tasks = TaskRegistry::new(
            Arc::new(remote.clone()),
            Arc::new(preferences.clone()),
            Arc::clone(&projects),
        );
        Self {
            remote,
            preferences,
            projects,
            tasks,
            project_id: None,
            task_names: HashMap::new(),
            last_delete_result: None,
        }
    }

    /// Returns the scenario's project.
    ///
    /// # Errors
    ///
    /// Returns an error if no project has been created yet.
    pub fn project(&self) -> Result<ProjectId, eyre::Report> {
        self.project_id
            .clone()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Resolves a task created under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was created under that name.
    pub fn task_named(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.task_names
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("no task named {name} in scenario world"))
    }
}

impl Default for TaskCountWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCountWorld {
    TaskCountWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
