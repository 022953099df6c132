//! In-memory preference store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::preferences::PreferenceStore;

/// Thread-safe in-memory preference store.
///
/// Clones share the same entries, which lets a test hand one clone to a
/// registry and inspect or pre-seed through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }
}
