//! Helpers for reading loosely typed JSON records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Coerces a record identifier to its canonical string form.
///
/// The API is inconsistent about identifiers: some records carry strings,
/// others integers. Empty strings and every other JSON type are rejected.
#[must_use]
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Reads and coerces the identifier stored under `field`.
#[must_use]
pub fn field_identifier(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(identifier)
}

/// Copies every field of `record` not named in `known`.
///
/// Non-object records have no fields.
#[must_use]
pub fn unknown_fields(record: &Value, known: &[&str]) -> Map<String, Value> {
    record
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(name, _)| !known.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Builds a record from `extra`, with `known` fields written over it.
#[must_use]
pub fn merge_fields<const N: usize>(
    extra: &Map<String, Value>,
    known: [(&str, Value); N],
) -> Value {
    let mut record = extra.clone();
    record.extend(known.map(|(name, value)| (name.to_owned(), value)));
    Value::Object(record)
}

/// A timestamp as the API sends it: epoch milliseconds or a date string.
///
/// The original form is kept so an edit writes back exactly what was read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`, or any other text.
    Text(String),
}

impl Timestamp {
    /// Wraps a textual timestamp.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Reads an integer or a string; other JSON values are rejected.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(Self::EpochMillis),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }

    /// Returns `true` for an empty string.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::EpochMillis(_) => false,
            Self::Text(text) => text.is_empty(),
        }
    }

    /// Returns milliseconds since the Unix epoch, if the value parses.
    ///
    /// Text without an offset is read as UTC; a bare date is midnight UTC.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        let raw = match self {
            Self::EpochMillis(millis) => return Some(*millis),
            Self::Text(text) => text.trim(),
        };
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.timestamp_millis());
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .into_iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc().timestamp_millis())
    }

    /// Orders by instant; unparseable values come first, by their text.
    #[must_use]
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        match (self.timestamp_millis(), other.timestamp_millis()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (None, None) => self.to_string().cmp(&other.to_string()),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EpochMillis(millis) => write!(f, "{millis}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
