//! JSON-file preference store.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use crate::fs::{open_parent_dir, read_optional, write_atomic};
use crate::preferences::PreferenceStore;

/// Errors raised while opening a [`JsonFilePreferenceStore`].
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// The preferences file or its directory could not be accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Preferences file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The preferences file is not a JSON object of strings.
    #[error("failed to parse preferences at {path}: {source}")]
    Parse {
        /// Preferences file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Preference store persisted as one JSON object.
///
/// Entries are loaded once on [`open`](Self::open) and every `set` rewrites
/// the file atomically (`.tmp` sibling, then rename). Write failures are
/// logged; the in-memory view stays authoritative for the session.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceStoreError::Io`] when the directory or file cannot
    /// be read, or [`PreferenceStoreError::Parse`] when the file is malformed.
    pub fn open(path: &Utf8Path) -> Result<Self, PreferenceStoreError> {
        let io_err = |source| PreferenceStoreError::Io {
            path: path.to_owned(),
            source,
        };
        let (dir, file_name) = open_parent_dir(path).map_err(io_err)?;
        let entries = match read_optional(&dir, file_name).map_err(io_err)? {
            Some(contents) => {
                serde_json::from_str(&contents).map_err(|source| PreferenceStoreError::Parse {
                    path: path.to_owned(),
                    source,
                })?
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            file_name: file_name.to_owned(),
            dir,
            path: path.to_owned(),
            entries: RwLock::new(entries),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        write_atomic(&self.dir, &self.file_name, &json)
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        if let Err(err) = self.persist(&entries) {
            tracing::warn!(path = %self.path, key, error = %err, "failed to persist preference");
        }
    }
}
