//! Project registry: the canonical in-memory project collection.

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::ordering::SortPreference;
use crate::preferences::{PreferenceStore, keys};
use crate::project::domain::{NewProject, Project, ProjectId, ProjectSortKey, create_body};
use crate::project::error::{ProjectRegistryError, ProjectRegistryResult};
use crate::project::ports::TaskCountLedger;
use crate::remote::{RemoteCollectionClient, Resource, ResourcePath};
use crate::sync::{KeyedSerializer, RetryPolicy, UnitOfWork};

#[derive(Debug)]
struct ProjectCollection {
    projects: Vec<Project>,
    sort: SortPreference<ProjectSortKey>,
}

impl ProjectCollection {
    fn find_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id() == id)
    }

    fn position(&self, id: &ProjectId) -> Option<usize> {
        self.projects.iter().position(|project| project.id() == id)
    }
}

/// Undo token of an optimistic edit.
struct EditUndo {
    previous: Option<Project>,
    body: Value,
}

/// Undo token of an optimistic task-count change.
struct CountChange {
    applied: i64,
    body: Value,
}

fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Owns the canonical project collection and keeps it in sync with the
/// remote API.
///
/// Every mutation goes through a [`UnitOfWork`], so a failed remote call
/// leaves the collection as it was before the call. Task-count changes for
/// one project are serialised; different projects proceed concurrently.
pub struct ProjectRegistry<R, S, C>
where
    R: RemoteCollectionClient + ?Sized,
    S: PreferenceStore + ?Sized,
    C: Clock + Send + Sync,
{
    remote: Arc<R>,
    preferences: Arc<S>,
    clock: Arc<C>,
    retry: RetryPolicy,
    state: RwLock<ProjectCollection>,
    lanes: KeyedSerializer,
    snapshots: watch::Sender<Vec<Project>>,
}

impl<R, S, C> ProjectRegistry<R, S, C>
where
    R: RemoteCollectionClient + ?Sized,
    S: PreferenceStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an empty registry, loading the stored sort preference.
    #[must_use]
    pub fn new(remote: Arc<R>, preferences: Arc<S>, clock: Arc<C>) -> Self {
        let sort = SortPreference::load(preferences.as_ref(), keys::PROJECT_SORT);
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            remote,
            preferences,
            clock,
            retry: RetryPolicy::default(),
            state: RwLock::new(ProjectCollection {
                projects: Vec::new(),
                sort,
            }),
            lanes: KeyedSerializer::new(),
            snapshots,
        }
    }

    /// Sets the retry policy for remote calls.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the collection with the server's projects.
    ///
    /// Records missing an id, name, status or creation timestamp are
    /// dropped. The current sort is re-applied without toggling it.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the previous collection is kept.
    pub async fn fetch_all(&self) -> ProjectRegistryResult<()> {
        let path = ResourcePath::collection(Resource::Projects);
        let records = self
            .retry
            .run("projects.fetch_all", || self.remote.get(&path))
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "failed to fetch projects; keeping previous collection");
                ProjectRegistryError::from(err)
            })?;

        let received = records.len();
        let projects: Vec<Project> = records.iter().filter_map(Project::from_record).collect();
        let dropped = received.saturating_sub(projects.len());
        if dropped > 0 {
            tracing::debug!(dropped, "dropped malformed project records");
        }

        self.mutate(|collection| {
            collection.projects = projects;
            self.apply_sort(collection);
        })
    }

    /// Creates a project.
    ///
    /// The project is shown at once under a placeholder id. When the server
    /// confirms, the placeholder entry is replaced by the server's record;
    /// when it fails, the placeholder is removed. A full [`fetch_all`]
    /// follows either way.
    ///
    /// [`fetch_all`]: Self::fetch_all
    ///
    /// # Errors
    ///
    /// Returns the remote failure of the create request, or
    /// [`ProjectRegistryError::MalformedRecord`] when the server's answer
    /// cannot be normalised.
    pub async fn add(&self, new_project: NewProject) -> ProjectRegistryResult<Project> {
        let placeholder = ProjectId::placeholder();
        let draft = new_project.into_draft(placeholder.clone(), self.clock.utc());
        let body = create_body(&draft);
        let path = ResourcePath::collection(Resource::Projects);

        let confirmed = UnitOfWork::new("projects.add", &self.retry)
            .run(
                || {
                    self.mutate(|collection| {
                        collection.projects.push(draft);
                        self.apply_sort(collection);
                    })
                },
                |_: &()| self.remote.post(&path, &body),
                |()| self.discard(&placeholder),
            )
            .await;

        let outcome = confirmed.and_then(|record| self.confirm_placeholder(&placeholder, &record));
        if let Err(err) = self.fetch_all().await {
            tracing::debug!(error = %err, "reconciling fetch after create failed");
        }
        outcome
    }

    fn confirm_placeholder(
        &self,
        placeholder: &ProjectId,
        record: &Value,
    ) -> ProjectRegistryResult<Project> {
        let Some(created) = Project::from_record(record) else {
            self.discard(placeholder)?;
            return Err(ProjectRegistryError::MalformedRecord);
        };
        self.mutate(|collection| {
            collection
                .projects
                .retain(|project| project.id() != placeholder && project.id() != created.id());
            collection.projects.push(created.clone());
            self.apply_sort(collection);
        })?;
        tracing::info!(project_id = %created.id(), placeholder = %placeholder, "project created");
        Ok(created)
    }

    fn discard(&self, id: &ProjectId) -> ProjectRegistryResult<()> {
        self.mutate(|collection| collection.projects.retain(|project| project.id() != id))
    }

    /// Updates a project.
    ///
    /// The local entry is replaced immediately, keeping its current task
    /// count (the count only moves through task deltas). If the update
    /// fails, the previous entry is restored.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after the rollback.
    pub async fn edit(&self, project: Project) -> ProjectRegistryResult<()> {
        let path = ResourcePath::item(Resource::Projects, project.id().as_str());

        UnitOfWork::new("projects.edit", &self.retry)
            .run(
                || self.apply_edit(project),
                |undo: &EditUndo| {
                    let body = undo.body.clone();
                    let target = &path;
                    async move { self.remote.put(target, &body).await }
                },
                |undo| undo.previous.map_or(Ok(()), |previous| self.restore(previous)),
            )
            .await?;
        Ok(())
    }

    fn apply_edit(&self, mut project: Project) -> ProjectRegistryResult<EditUndo> {
        self.mutate(|collection| {
            let previous = collection.find_mut(project.id()).map(|slot| {
                project.set_task_count(slot.task_count());
                std::mem::replace(slot, project.clone())
            });
            self.apply_sort(collection);
            EditUndo {
                previous,
                body: project.to_record(),
            }
        })
    }

    fn restore(&self, mut previous: Project) -> ProjectRegistryResult<()> {
        self.mutate(|collection| {
            if let Some(slot) = collection.find_mut(previous.id()) {
                previous.set_task_count(slot.task_count());
                *slot = previous;
            }
            self.apply_sort(collection);
        })
    }

    /// Deletes a project.
    ///
    /// The entry is detached immediately and reinserted at its previous
    /// position if the delete fails.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after the rollback.
    pub async fn remove(&self, id: &ProjectId) -> ProjectRegistryResult<()> {
        let path = ResourcePath::item(Resource::Projects, id.as_str());

        UnitOfWork::new("projects.remove", &self.retry)
            .run(
                || {
                    self.mutate(|collection| {
                        let detached = collection
                            .position(id)
                            .map(|index| (index, collection.projects.remove(index)));
                        self.apply_sort(collection);
                        detached
                    })
                },
                |_: &Option<(usize, Project)>| self.remote.delete(&path),
                |detached| {
                    detached.map_or(Ok(()), |(index, project)| {
                        self.mutate(|collection| {
                            let at = index.min(collection.projects.len());
                            collection.projects.insert(at, project);
                            self.apply_sort(collection);
                        })
                    })
                },
            )
            .await?;
        tracing::info!(project_id = %id, "project removed");
        Ok(())
    }

    /// Adds `delta` to a project's task count, clamped at zero.
    ///
    /// The count changes immediately and the project is then persisted. If
    /// persisting fails, the applied change is subtracted again so the count
    /// returns exactly to its value before the call. Calls for the same
    /// project run one at a time in arrival order. Unknown projects are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after compensation.
    pub async fn adjust_task_count(
        &self,
        project_id: &ProjectId,
        delta: i64,
    ) -> ProjectRegistryResult<()> {
        let _lane = self.lanes.acquire(project_id.as_str()).await;
        let path = ResourcePath::item(Resource::Projects, project_id.as_str());

        let outcome = UnitOfWork::new("projects.adjust_task_count", &self.retry)
            .run(
                || self.apply_count_delta(project_id, delta),
                |change: &CountChange| {
                    let body = change.body.clone();
                    let target = &path;
                    async move { self.remote.put(target, &body).await }
                },
                |change| self.revert_count(project_id, change.applied),
            )
            .await;

        match outcome {
            Ok(_) => Ok(()),
            Err(ProjectRegistryError::UnknownProject(missing)) => {
                tracing::debug!(project_id = %missing, delta, "task count change for unloaded project ignored");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn apply_count_delta(
        &self,
        project_id: &ProjectId,
        delta: i64,
    ) -> ProjectRegistryResult<CountChange> {
        self.mutate(|collection| {
            let project = collection.find_mut(project_id)?;
            let before = project.task_count();
            let after = clamp_count(i64::from(before).saturating_add(delta));
            project.set_task_count(after);
            let change = CountChange {
                applied: i64::from(after).saturating_sub(i64::from(before)),
                body: project.to_record(),
            };
            self.apply_sort(collection);
            Some(change)
        })?
        .ok_or_else(|| ProjectRegistryError::UnknownProject(project_id.clone()))
    }

    fn revert_count(&self, project_id: &ProjectId, applied: i64) -> ProjectRegistryResult<()> {
        self.mutate(|collection| {
            if let Some(project) = collection.find_mut(project_id) {
                let restored = clamp_count(i64::from(project.task_count()).saturating_sub(applied));
                project.set_task_count(restored);
            }
            self.apply_sort(collection);
        })
    }

    /// Sorts the collection.
    ///
    /// Without `preserve_order`, sorting by the current key flips the
    /// direction and sorting by a new key starts ascending. The preference
    /// is persisted every time.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::State`] when registry state is
    /// unavailable.
    pub fn sort(&self, key: ProjectSortKey, preserve_order: bool) -> ProjectRegistryResult<()> {
        self.mutate(|collection| {
            collection.sort.select(key, preserve_order);
            self.apply_sort(collection);
        })
    }

    /// Re-applies the current sort without toggling it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::State`] when registry state is
    /// unavailable.
    pub fn resort(&self) -> ProjectRegistryResult<()> {
        self.mutate(|collection| self.apply_sort(collection))
    }

    /// Returns a snapshot of the collection in display order.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::State`] when registry state is
    /// unavailable.
    pub fn projects(&self) -> ProjectRegistryResult<Vec<Project>> {
        self.read(|collection| collection.projects.clone())
    }

    /// Returns the project with `id`, if loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::State`] when registry state is
    /// unavailable.
    pub fn get(&self, id: &ProjectId) -> ProjectRegistryResult<Option<Project>> {
        self.read(|collection| {
            collection
                .projects
                .iter()
                .find(|project| project.id() == id)
                .cloned()
        })
    }

    /// Returns the current sort preference.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::State`] when registry state is
    /// unavailable.
    pub fn sort_preference(&self) -> ProjectRegistryResult<SortPreference<ProjectSortKey>> {
        self.read(|collection| collection.sort)
    }

    /// Subscribes to collection snapshots published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Project>> {
        self.snapshots.subscribe()
    }

    fn apply_sort(&self, collection: &mut ProjectCollection) {
        collection
            .sort
            .persist(self.preferences.as_ref(), keys::PROJECT_SORT);
        collection.sort.sort(&mut collection.projects);
    }

    fn read<T>(&self, view: impl FnOnce(&ProjectCollection) -> T) -> ProjectRegistryResult<T> {
        let state = self
            .state
            .read()
            .map_err(|err| ProjectRegistryError::state(&err))?;
        Ok(view(&state))
    }

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut ProjectCollection) -> T,
    ) -> ProjectRegistryResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|err| ProjectRegistryError::state(&err))?;
        let outcome = change(&mut state);
        self.snapshots.send_replace(state.projects.clone());
        Ok(outcome)
    }
}

#[async_trait]
impl<R, S, C> TaskCountLedger for ProjectRegistry<R, S, C>
where
    R: RemoteCollectionClient + ?Sized,
    S: PreferenceStore + ?Sized,
    C: Clock + Send + Sync,
{
    async fn adjust_task_count(
        &self,
        project_id: &ProjectId,
        delta: i64,
    ) -> ProjectRegistryResult<()> {
        Self::adjust_task_count(self, project_id, delta).await
    }
}
