//! Resource-scoped request paths.

use std::fmt;

/// Remote resource collections exposed by the tracker API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The `/projects` collection.
    Projects,
    /// The `/tasks` collection.
    Tasks,
}

impl Resource {
    /// Returns the collection segment used in request paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP-style verb of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteMethod {
    /// Collection or record read.
    Get,
    /// Record creation.
    Post,
    /// Full record replacement.
    Put,
    /// Partial record update.
    Patch,
    /// Record removal.
    Delete,
}

impl RemoteMethod {
    /// Returns the canonical verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of a remote call: a collection, optionally narrowed to one record
/// (`/{id}`) or filtered by a field (`?field=value`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    resource: Resource,
    id: Option<String>,
    filter: Option<(String, String)>,
}

impl ResourcePath {
    /// Addresses a whole collection.
    #[must_use]
    pub const fn collection(resource: Resource) -> Self {
        Self {
            resource,
            id: None,
            filter: None,
        }
    }

    /// Addresses a single record by identifier.
    #[must_use]
    pub fn item(resource: Resource, id: impl Into<String>) -> Self {
        Self {
            resource,
            id: Some(id.into()),
            filter: None,
        }
    }

    /// Restricts a collection read to records whose `field` equals `value`.
    #[must_use]
    pub fn filtered(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    /// Returns the addressed collection.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    /// Returns the record identifier, if the path addresses one record.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the field filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<(&str, &str)> {
        self.filter
            .as_ref()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// Returns the path without its query string.
    #[must_use]
    pub fn route(&self) -> String {
        self.id.as_ref().map_or_else(
            || format!("/{}", self.resource),
            |id| format!("/{}/{id}", self.resource),
        )
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())?;
        if let Some((field, value)) = self.filter() {
            write!(f, "?{field}={value}")?;
        }
        Ok(())
    }
}
