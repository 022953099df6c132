//! Identifier type for projects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of digits in a locally generated placeholder identifier.
const PLACEHOLDER_DIGITS: u128 = 10_000_000_000;

/// Identifier of a project in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a 10-digit numeric placeholder.
    ///
    /// Placeholders key an optimistic entry until the server assigns the
    /// real identifier; they are not guaranteed unique against server ids.
    #[must_use]
    pub fn placeholder() -> Self {
        let digits = Uuid::new_v4().as_u128().rem_euclid(PLACEHOLDER_DIGITS);
        Self(format!("{digits:010}"))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
