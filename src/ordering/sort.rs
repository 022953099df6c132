//! Sort preferences and stable sorting.

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::preferences::{PreferenceStore, SortSlots};

/// Direction applied to a comparator result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first; stored as `1`.
    #[default]
    Ascending,
    /// Largest first; stored as `-1`.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_stored(self) -> &'static str {
        match self {
            Self::Ascending => "1",
            Self::Descending => "-1",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stored())
    }
}

/// A stored sort value that names no known key or direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised sort value: {0}")]
pub struct ParseSortError(pub String);

impl TryFrom<&str> for SortDirection {
    type Error = ParseSortError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "1" => Ok(Self::Ascending),
            "-1" => Ok(Self::Descending),
            other => Err(ParseSortError(other.to_owned())),
        }
    }
}

/// A sortable field of an entity, bound to a typed comparison.
///
/// Implementations are closed enums: every variant names one field and
/// compares the concrete value of that field. Ties return
/// [`Ordering::Equal`] and are never broken.
pub trait SortKey: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Entity the key sorts.
    type Entity;

    /// Key used when nothing (or garbage) is stored.
    const DEFAULT: Self;

    /// Field name used for persistence.
    fn field_name(self) -> &'static str;

    /// Resolves a persisted field name.
    fn from_field_name(name: &str) -> Option<Self>;

    /// Compares two entities ascending on this field.
    fn compare(self, left: &Self::Entity, right: &Self::Entity) -> Ordering;
}

/// Current sort key and direction of one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortPreference<K> {
    key: K,
    direction: SortDirection,
}

impl<K: SortKey> Default for SortPreference<K> {
    fn default() -> Self {
        Self::new(K::DEFAULT, SortDirection::Ascending)
    }
}

impl<K: SortKey> SortPreference<K> {
    /// Creates a preference.
    #[must_use]
    pub const fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn key(&self) -> K {
        self.key
    }

    /// Returns the sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Applies a sort request.
    ///
    /// With `preserve_order` the preference is left untouched. Otherwise the
    /// same key flips direction and a different key starts ascending.
    pub fn select(&mut self, key: K, preserve_order: bool) {
        if preserve_order {
            return;
        }
        if key == self.key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Loads the preference from `store`.
    ///
    /// Each slot falls back to its default independently when missing or
    /// unrecognised.
    #[must_use]
    pub fn load<P>(store: &P, slots: SortSlots) -> Self
    where
        P: PreferenceStore + ?Sized,
    {
        let key = store
            .get(slots.key)
            .and_then(|name| K::from_field_name(&name))
            .unwrap_or(K::DEFAULT);
        let direction = store
            .get(slots.order)
            .and_then(|stored| SortDirection::try_from(stored.as_str()).ok())
            .unwrap_or_default();
        Self::new(key, direction)
    }

    /// Writes the preference to `store`.
    pub fn persist<P>(&self, store: &P, slots: SortSlots)
    where
        P: PreferenceStore + ?Sized,
    {
        store.set(slots.key, self.key.field_name());
        store.set(slots.order, self.direction.as_stored());
    }

    /// Sorts `items` by this preference.
    pub fn sort(&self, items: &mut [K::Entity]) {
        stable_sort(items, self.key, self.direction);
    }
}

/// Stable sort of `items` on `key` in `direction`.
///
/// Entries that compare equal keep their prior relative order.
pub fn stable_sort<K: SortKey>(items: &mut [K::Entity], key: K, direction: SortDirection) {
    items.sort_by(|left, right| direction.apply(key.compare(left, right)));
}
