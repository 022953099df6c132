//! Tracker configuration.
//!
//! Configuration is a single JSON document in which every field is optional:
//!
//! ```json
//! {
//!   "api_base_url": "http://localhost:3000",
//!   "notification_ttl_ms": 3000,
//!   "retry": { "max_attempts": 3, "backoff_ms": 250 },
//!   "preferences_path": "state/preferences.json"
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::fs::{open_existing_parent_dir, read_optional};
use crate::sync::RetryPolicy;

/// Errors raised while loading a [`TrackerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid configuration JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its accepted range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by the registries, the notifier and the adapters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    api_base_url: String,
    notification_ttl_ms: u64,
    retry: RetryPolicy,
    preferences_path: Option<Utf8PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_owned(),
            notification_ttl_ms: 3000,
            retry: RetryPolicy::default(),
            preferences_path: None,
        }
    }
}

impl TrackerConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`. A missing file or directory yields
    /// the defaults; nothing is created on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_owned(),
            source,
        };
        let contents = open_existing_parent_dir(path)
            .and_then(|opened| {
                opened.map_or(Ok(None), |(dir, file_name)| read_optional(&dir, file_name))
            })
            .map_err(io_err)?;
        match contents {
            Some(document) => Self::from_json_str(&document),
            None => {
                tracing::debug!(path = %path, "configuration file absent; using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts() == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "api_base_url must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the notification auto-clear window.
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the retry policy for remote calls.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the preferences file path.
    #[must_use]
    pub fn with_preferences_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.preferences_path = Some(path.into());
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the notification auto-clear window.
    #[must_use]
    pub const fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Returns the retry policy for remote calls.
    #[must_use]
    pub const fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns the preferences file path, if configured.
    #[must_use]
    pub fn preferences_path(&self) -> Option<&Utf8Path> {
        self.preferences_path.as_deref()
    }
}
