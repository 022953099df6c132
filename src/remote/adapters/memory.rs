//! In-memory remote collection for tests and local flows.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::remote::{
    RemoteCollectionClient, RemoteError, RemoteMethod, RemoteResult, Resource, ResourcePath,
    record,
};

/// Thread-safe in-memory stand-in for the tracker API.
///
/// Behaves like a minimal JSON REST server: records are kept per collection,
/// created records receive numeric server identifiers (any client-supplied
/// `id` is overwritten), and `?field=value` filters compare coerced
/// identifiers. Failures can be injected per method and every call is
/// journalled for assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteCollection {
    state: Arc<RwLock<InMemoryRemoteState>>,
}

#[derive(Debug, Default)]
struct InMemoryRemoteState {
    collections: HashMap<Resource, Vec<Value>>,
    next_id: u64,
    pending_failures: HashMap<RemoteMethod, usize>,
    offline: bool,
    latency: Option<Duration>,
    journal: Vec<(RemoteMethod, String)>,
}

fn lock_error(err: &impl std::fmt::Display) -> RemoteError {
    RemoteError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryRemoteCollection {
    /// Creates an empty remote collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts raw records into a collection, bypassing id assignment.
    ///
    /// Numeric identifiers advance the server id counter so later creates
    /// never collide with seeded records.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn seed(
        &self,
        resource: Resource,
        records: impl IntoIterator<Item = Value>,
    ) -> RemoteResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        for seeded in records {
            if let Some(numeric) = record::field_identifier(&seeded, "id")
                .and_then(|id| id.parse::<u64>().ok())
            {
                state.next_id = state.next_id.max(numeric);
            }
            state.collections.entry(resource).or_default().push(seeded);
        }
        Ok(())
    }

    /// Returns a copy of the records stored for a collection.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn records(&self, resource: Resource) -> RemoteResult<Vec<Value>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.collections.get(&resource).cloned().unwrap_or_default())
    }

    /// Makes the next `count` calls using `method` fail with a transport
    /// error.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_next(&self, method: RemoteMethod, count: usize) -> RemoteResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let pending = state.pending_failures.entry(method).or_default();
        *pending = pending.saturating_add(count);
        Ok(())
    }

    /// Fails every call while `offline` is set.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_offline(&self, offline: bool) -> RemoteResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        state.offline = offline;
        Ok(())
    }

    /// Delays every call by `latency` before it is served.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_latency(&self, latency: Duration) -> RemoteResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        state.latency = Some(latency);
        Ok(())
    }

    /// Returns every call served so far as `(method, path)` pairs.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn journal(&self) -> RemoteResult<Vec<(RemoteMethod, String)>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.journal.clone())
    }

    /// Waits out the configured latency, then journals the call and applies
    /// any injected failure.
    async fn admit(&self, method: RemoteMethod, path: &ResourcePath) -> RemoteResult<()> {
        let latency = self.state.read().map_err(|err| lock_error(&err))?.latency;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        state.journal.push((method, path.to_string()));
        if state.offline {
            return Err(RemoteError::transport(std::io::Error::other(
                "remote collection is offline",
            )));
        }
        if let Some(pending) = state.pending_failures.get_mut(&method)
            && *pending > 0
        {
            *pending = pending.saturating_sub(1);
            return Err(RemoteError::transport(std::io::Error::other(format!(
                "injected {method} failure"
            ))));
        }
        Ok(())
    }
}

fn matches_id(record: &Value, id: &str) -> bool {
    record::field_identifier(record, "id").is_some_and(|candidate| candidate == id)
}

fn required_id(path: &ResourcePath) -> RemoteResult<&str> {
    path.id().ok_or_else(|| RemoteError::NotFound(path.to_string()))
}

fn locate(state: &InMemoryRemoteState, path: &ResourcePath) -> RemoteResult<usize> {
    let id = required_id(path)?;
    state
        .collections
        .get(&path.resource())
        .and_then(|records| records.iter().position(|stored| matches_id(stored, id)))
        .ok_or_else(|| RemoteError::NotFound(path.to_string()))
}

#[async_trait]
impl RemoteCollectionClient for InMemoryRemoteCollection {
    async fn get(&self, path: &ResourcePath) -> RemoteResult<Vec<Value>> {
        self.admit(RemoteMethod::Get, path).await?;
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        let records = state
            .collections
            .get(&path.resource())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let selected = records
            .iter()
            .filter(|stored| path.id().is_none_or(|id| matches_id(stored, id)))
            .filter(|stored| {
                path.filter().is_none_or(|(field, value)| {
                    record::field_identifier(stored, field).is_some_and(|found| found == value)
                })
            })
            .cloned()
            .collect();
        Ok(selected)
    }

    async fn post(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        self.admit(RemoteMethod::Post, path).await?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        state.next_id = state.next_id.saturating_add(1);
        let assigned = state.next_id;

        let mut created = body.clone();
        let Some(fields) = created.as_object_mut() else {
            return Err(RemoteError::Status {
                code: 400,
                path: path.to_string(),
            });
        };
        fields.insert("id".to_owned(), Value::from(assigned));
        state
            .collections
            .entry(path.resource())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn put(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        self.admit(RemoteMethod::Put, path).await?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let position = locate(&state, path)?;
        let slot = state
            .collections
            .get_mut(&path.resource())
            .and_then(|records| records.get_mut(position))
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;

        let stored_id = slot.get("id").cloned().unwrap_or(Value::Null);
        let mut replacement = body.clone();
        if let Some(fields) = replacement.as_object_mut() {
            fields.insert("id".to_owned(), stored_id);
        }
        *slot = replacement.clone();
        Ok(replacement)
    }

    async fn patch(&self, path: &ResourcePath, body: &Value) -> RemoteResult<Value> {
        self.admit(RemoteMethod::Patch, path).await?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let position = locate(&state, path)?;
        let slot = state
            .collections
            .get_mut(&path.resource())
            .and_then(|records| records.get_mut(position))
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;

        if let (Some(target), Some(changes)) = (slot.as_object_mut(), body.as_object()) {
            for (field, value) in changes {
                if field != "id" {
                    target.insert(field.clone(), value.clone());
                }
            }
        }
        Ok(slot.clone())
    }

    async fn delete(&self, path: &ResourcePath) -> RemoteResult<()> {
        self.admit(RemoteMethod::Delete, path).await?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let position = locate(&state, path)?;
        if let Some(records) = state.collections.get_mut(&path.resource()) {
            records.remove(position);
        }
        Ok(())
    }
}
