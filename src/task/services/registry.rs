//! Task registry: the canonical in-memory task collection.

use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::ordering::{SortPreference, merge_manual_order, resolve_drop};
use crate::preferences::{PreferenceStore, keys};
use crate::project::domain::ProjectId;
use crate::project::ports::TaskCountLedger;
use crate::remote::{RemoteCollectionClient, Resource, ResourcePath};
use crate::sync::{RetryPolicy, UnitOfWork};
use crate::task::domain::{NewTask, Task, TaskId, TaskSortKey, TaskStatus};
use crate::task::error::{TaskRegistryError, TaskRegistryResult};

#[derive(Debug)]
struct TaskCollection {
    tasks: Vec<Task>,
    sort: SortPreference<TaskSortKey>,
}

impl TaskCollection {
    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }
}

/// Owns the canonical task collection.
///
/// Task creation and removal move the owning project's task count through
/// the injected [`TaskCountLedger`]; the count is only touched after the
/// server has confirmed the change.
pub struct TaskRegistry<R, S, L>
where
    R: RemoteCollectionClient + ?Sized,
    S: PreferenceStore + ?Sized,
    L: TaskCountLedger + ?Sized,
{
    remote: Arc<R>,
    preferences: Arc<S>,
    ledger: Arc<L>,
    retry: RetryPolicy,
    state: RwLock<TaskCollection>,
    snapshots: watch::Sender<Vec<Task>>,
}

impl<R, S, L> TaskRegistry<R, S, L>
where
    R: RemoteCollectionClient + ?Sized,
    S: PreferenceStore + ?Sized,
    L: TaskCountLedger + ?Sized,
{
    /// Creates an empty registry, loading the stored sort preference.
    #[must_use]
    pub fn new(remote: Arc<R>, preferences: Arc<S>, ledger: Arc<L>) -> Self {
        let sort = SortPreference::load(preferences.as_ref(), keys::TASK_SORT);
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            remote,
            preferences,
            ledger,
            retry: RetryPolicy::default(),
            state: RwLock::new(TaskCollection {
                tasks: Vec::new(),
                sort,
            }),
            snapshots,
        }
    }

    /// Sets the retry policy for remote calls.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Loads the tasks of one project, replacing the collection.
    ///
    /// A persisted manual order for the project is applied: ordered tasks
    /// first, then unordered ones in fetch order. No sort is applied.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the collection is left unchanged.
    pub async fn fetch_by_project(&self, project_id: &ProjectId) -> TaskRegistryResult<()> {
        let path = ResourcePath::collection(Resource::Tasks)
            .filtered("project_id", project_id.as_str());
        let records = self
            .retry
            .run("tasks.fetch_by_project", || self.remote.get(&path))
            .await
            .map_err(|err| {
                tracing::warn!(project_id = %project_id, error = %err, "failed to fetch tasks");
                TaskRegistryError::from(err)
            })?;

        let fetched: Vec<Task> = records
            .iter()
            .filter_map(Task::from_record)
            .filter(|task| task.project_id() == project_id)
            .collect();
        let persisted = self.manual_order(project_id);
        let ordered = merge_manual_order(fetched, &persisted, Task::id);

        self.mutate(|collection| collection.tasks = ordered)
    }

    /// Loads every task, replacing the collection. No manual order applies.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the collection is left unchanged.
    pub async fn fetch_all(&self) -> TaskRegistryResult<()> {
        let path = ResourcePath::collection(Resource::Tasks);
        let records = self
            .retry
            .run("tasks.fetch_all", || self.remote.get(&path))
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "failed to fetch tasks");
                TaskRegistryError::from(err)
            })?;

        let received = records.len();
        let tasks: Vec<Task> = records.iter().filter_map(Task::from_record).collect();
        let dropped = received.saturating_sub(tasks.len());
        if dropped > 0 {
            tracing::debug!(dropped, "dropped task records without id or project");
        }
        self.mutate(|collection| collection.tasks = tasks)
    }

    /// Creates a task and increments its project's task count.
    ///
    /// The task is keyed by the server-returned identifier.
    ///
    /// # Errors
    ///
    /// Returns the remote failure (nothing changes locally, and the count is
    /// not touched) or [`TaskRegistryError::MalformedRecord`].
    pub async fn add(&self, new_task: NewTask) -> TaskRegistryResult<Task> {
        let path = ResourcePath::collection(Resource::Tasks);
        let project_id = new_task.project_id().clone();
        let body = new_task.into_record();
        let record = self
            .retry
            .run("tasks.add", || self.remote.post(&path, &body))
            .await
            .map_err(|err| {
                tracing::warn!(project_id = %project_id, error = %err, "failed to create task");
                TaskRegistryError::from(err)
            })?;
        let task = Task::from_record(&record).ok_or(TaskRegistryError::MalformedRecord)?;

        self.mutate(|collection| collection.tasks.push(task.clone()))?;
        self.move_count(task.project_id(), 1).await;
        self.resort()?;
        tracing::info!(task_id = %task.id(), project_id = %task.project_id(), "task created");
        Ok(task)
    }

    /// Updates a task.
    ///
    /// The local entry is replaced before the request is sent and restored
    /// if it fails. Moving a task to another project moves one unit of task
    /// count between the two projects once the server confirms.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after the rollback.
    pub async fn edit(&self, task: Task) -> TaskRegistryResult<()> {
        let id = task.id().clone();
        let path = ResourcePath::item(Resource::Tasks, id.as_str());
        let body = task.to_record();
        let moved_to = task.project_id().clone();

        let replaced = UnitOfWork::new("tasks.edit", &self.retry)
            .run(
                || {
                    self.mutate(|collection| {
                        let previous = collection
                            .find_mut(&id)
                            .map(|slot| std::mem::replace(slot, task));
                        self.apply_sort(collection);
                        previous
                    })
                },
                |previous: &Option<Task>| {
                    let snapshot = previous.clone();
                    let target = &path;
                    let payload = &body;
                    async move { self.remote.put(target, payload).await.map(|_| snapshot) }
                },
                |previous| previous.map_or(Ok(()), |entry| self.restore(entry)),
            )
            .await?;

        if let Some(before) = replaced
            && *before.project_id() != moved_to
        {
            self.move_count(before.project_id(), -1).await;
            self.move_count(&moved_to, 1).await;
        }
        Ok(())
    }

    fn restore(&self, previous: Task) -> TaskRegistryResult<()> {
        self.mutate(|collection| {
            if let Some(slot) = collection.find_mut(previous.id()) {
                *slot = previous;
            }
            self.apply_sort(collection);
        })
    }

    /// Changes only the status of a task via a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::UnknownTask`] when the task is not
    /// loaded, or the remote failure after the status is rolled back.
    pub async fn set_status(&self, id: &TaskId, status: TaskStatus) -> TaskRegistryResult<()> {
        let path = ResourcePath::item(Resource::Tasks, id.as_str());
        let body = json!({ "status": status });

        UnitOfWork::new("tasks.set_status", &self.retry)
            .run(
                || {
                    self.mutate(|collection| {
                        let previous = collection
                            .find_mut(id)
                            .map(|task| task.replace_status(status));
                        self.apply_sort(collection);
                        previous
                    })?
                    .ok_or_else(|| TaskRegistryError::UnknownTask(id.clone()))
                },
                |_: &TaskStatus| self.remote.patch(&path, &body),
                |previous| {
                    self.mutate(|collection| {
                        if let Some(task) = collection.find_mut(id) {
                            task.replace_status(previous);
                        }
                        self.apply_sort(collection);
                    })
                },
            )
            .await?;
        Ok(())
    }

    /// Deletes a task and decrements its project's task count.
    ///
    /// Removing a task that is not loaded is a no-op. The task is detached
    /// immediately; if the delete fails it is reinserted at its previous
    /// position and the count is left alone.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after the reinsert.
    pub async fn remove(&self, id: &TaskId) -> TaskRegistryResult<()> {
        let path = ResourcePath::item(Resource::Tasks, id.as_str());

        let outcome = UnitOfWork::new("tasks.remove", &self.retry)
            .run(
                || {
                    self.mutate(|collection| {
                        collection
                            .position(id)
                            .map(|index| (index, collection.tasks.remove(index)))
                    })?
                    .ok_or_else(|| TaskRegistryError::UnknownTask(id.clone()))
                },
                |detached: &(usize, Task)| {
                    let owner = detached.1.project_id().clone();
                    let target = &path;
                    async move { self.remote.delete(target).await.map(|()| owner) }
                },
                |(index, task)| {
                    self.mutate(|collection| {
                        let at = index.min(collection.tasks.len());
                        collection.tasks.insert(at, task);
                    })
                },
            )
            .await;

        let owner = match outcome {
            Ok(owner) => owner,
            Err(TaskRegistryError::UnknownTask(missing)) => {
                tracing::debug!(task_id = %missing, "remove of unloaded task ignored");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        self.move_count(&owner, -1).await;
        self.resort()?;
        tracing::info!(task_id = %id, project_id = %owner, "task removed");
        Ok(())
    }

    /// Sorts the collection.
    ///
    /// Same contract as the project registry: the current key flips the
    /// direction unless `preserve_order` is set, a new key starts ascending,
    /// and the preference is persisted every time. The persisted manual
    /// order is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn sort(&self, key: TaskSortKey, preserve_order: bool) -> TaskRegistryResult<()> {
        self.mutate(|collection| {
            collection.sort.select(key, preserve_order);
            self.apply_sort(collection);
        })
    }

    /// Re-applies the current sort without toggling it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn resort(&self) -> TaskRegistryResult<()> {
        self.mutate(|collection| self.apply_sort(collection))
    }

    /// Rearranges one project's tasks and persists the order.
    ///
    /// `ordered_ids` must name every loaded task of the project exactly
    /// once; anything else is rejected without touching the collection.
    /// On success the project's tasks follow all other tasks.
    ///
    /// Returns whether the new order was committed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn reorder(
        &self,
        project_id: &ProjectId,
        ordered_ids: &[TaskId],
    ) -> TaskRegistryResult<bool> {
        let committed = self.mutate(|collection| {
            let (mine, others): (Vec<Task>, Vec<Task>) = collection
                .tasks
                .iter()
                .cloned()
                .partition(|task| task.project_id() == project_id);
            let Some(reordered) = arrange(&mine, ordered_ids) else {
                return false;
            };
            collection.tasks = others;
            collection.tasks.extend(reordered);
            true
        })?;

        if committed {
            let order = Value::from(
                ordered_ids
                    .iter()
                    .map(|id| Value::from(id.as_str()))
                    .collect::<Vec<_>>(),
            );
            self.preferences
                .set(&keys::task_order(project_id.as_str()), &order.to_string());
        } else {
            tracing::debug!(project_id = %project_id, "reorder rejected: ids do not match loaded tasks");
        }
        Ok(committed)
    }

    /// Applies a drag-and-drop gesture: `dragged` takes `target`'s place
    /// among the project's tasks.
    ///
    /// Returns whether a new order was committed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn drop_onto(
        &self,
        project_id: &ProjectId,
        dragged: &TaskId,
        target: &TaskId,
    ) -> TaskRegistryResult<bool> {
        let resolved = self.read(|collection| {
            resolve_drop(dragged, target, &collection.tasks, Task::id, |task| {
                task.project_id() == project_id
            })
        })?;
        resolved.map_or(Ok(false), |ids| self.reorder(project_id, &ids))
    }

    /// Returns the persisted manual order of a project.
    ///
    /// A missing or corrupt entry yields an empty order.
    #[must_use]
    pub fn manual_order(&self, project_id: &ProjectId) -> Vec<TaskId> {
        let Some(stored) = self.preferences.get(&keys::task_order(project_id.as_str())) else {
            return Vec::new();
        };
        serde_json::from_str::<Vec<TaskId>>(&stored).unwrap_or_else(|err| {
            tracing::debug!(project_id = %project_id, error = %err, "ignoring corrupt manual order");
            Vec::new()
        })
    }

    /// Returns a snapshot of the collection in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn tasks(&self) -> TaskRegistryResult<Vec<Task>> {
        self.read(|collection| collection.tasks.clone())
    }

    /// Returns the task with `id`, if loaded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn get(&self, id: &TaskId) -> TaskRegistryResult<Option<Task>> {
        self.read(|collection| collection.tasks.iter().find(|task| task.id() == id).cloned())
    }

    /// Returns the current sort preference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::State`] when registry state is
    /// unavailable.
    pub fn sort_preference(&self) -> TaskRegistryResult<SortPreference<TaskSortKey>> {
        self.read(|collection| collection.sort)
    }

    /// Subscribes to collection snapshots published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.snapshots.subscribe()
    }

    async fn move_count(&self, project_id: &ProjectId, delta: i64) {
        if let Err(err) = self.ledger.adjust_task_count(project_id, delta).await {
            tracing::warn!(project_id = %project_id, delta, error = %err, "task count change was rolled back");
        }
    }

    fn apply_sort(&self, collection: &mut TaskCollection) {
        collection
            .sort
            .persist(self.preferences.as_ref(), keys::TASK_SORT);
        collection.sort.sort(&mut collection.tasks);
    }

    fn read<T>(&self, view: impl FnOnce(&TaskCollection) -> T) -> TaskRegistryResult<T> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskRegistryError::state(&err))?;
        Ok(view(&state))
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut TaskCollection) -> T) -> TaskRegistryResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskRegistryError::state(&err))?;
        let outcome = change(&mut state);
        self.snapshots.send_replace(state.tasks.clone());
        Ok(outcome)
    }
}

/// Orders `tasks` by `ordered_ids`, or `None` unless the ids are an exact
/// permutation of the tasks' ids.
fn arrange(tasks: &[Task], ordered_ids: &[TaskId]) -> Option<Vec<Task>> {
    if ordered_ids.len() != tasks.len() {
        return None;
    }
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    ordered_ids
        .iter()
        .map(|id| {
            if !seen.insert(id) {
                return None;
            }
            tasks.iter().find(|task| task.id() == id).cloned()
        })
        .collect()
}
