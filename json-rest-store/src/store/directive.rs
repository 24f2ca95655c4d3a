//! Filter, sort and range types handed to a [`Store`](super::Store)
//!
//! # Example
//!
//! ```rust
//! use json_rest_store::store::{ItemRange, SortDirection, SortSpec};
//!
//! let mut sort = SortSpec::new();
//! sort.insert("name", SortDirection::Ascending);
//! sort.insert("age", SortDirection::Descending);
//!
//! assert_eq!(sort.get("age"), Some(SortDirection::Descending));
//!
//! let range = ItemRange::new(0, 9);
//! assert_eq!(range.len(), 10);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Equality filters: field name to the exact string it must equal
pub type Filters = BTreeMap<String, String>;

/// Direction of one sort term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Numeric form used by document stores: `1` ascending, `-1` descending
    ///
    /// ```rust
    /// use json_rest_store::store::SortDirection;
    ///
    /// assert_eq!(SortDirection::Ascending.as_i8(), 1);
    /// assert_eq!(SortDirection::Descending.as_i8(), -1);
    /// ```
    #[must_use]
    pub const fn as_i8(&self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Ordered field-to-direction mapping
///
/// Fields keep the position of their first insertion; inserting a field again
/// replaces its direction in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    terms: Vec<(String, SortDirection)>,
}

impl SortSpec {
    /// Create an empty sort specification
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction for `field`
    pub fn insert(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.terms.iter_mut().find(|(name, _)| *name == field) {
            Some(term) => term.1 = direction,
            None => self.terms.push((field, direction)),
        }
    }

    /// Direction recorded for `field`, if any
    #[must_use]
    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.terms
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, direction)| *direction)
    }

    /// Terms in sort priority order
    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.terms
            .iter()
            .map(|(name, direction)| (name.as_str(), *direction))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Inclusive item window requested with `Range: items=<start>-<end>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRange {
    /// Index of the first item
    pub start: u64,
    /// Index of the last item, as requested
    pub end: u64,
}

impl ItemRange {
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of items the window covers; zero when `end < start`
    #[must_use]
    pub const fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).saturating_add(1)
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_spec_keeps_first_position_on_overwrite() {
        let mut sort = SortSpec::new();
        sort.insert("a", SortDirection::Ascending);
        sort.insert("b", SortDirection::Descending);
        sort.insert("a", SortDirection::Descending);

        let terms: Vec<_> = sort.iter().collect();
        assert_eq!(
            terms,
            vec![
                ("a", SortDirection::Descending),
                ("b", SortDirection::Descending)
            ]
        );
        assert_eq!(sort.len(), 2);
    }

    #[test]
    fn test_sort_spec_get_missing() {
        let sort = SortSpec::new();
        assert!(sort.is_empty());
        assert_eq!(sort.get("a"), None);
    }

    #[test]
    fn test_sort_direction_display() {
        assert_eq!(format!("{}", SortDirection::Ascending), "asc");
        assert_eq!(format!("{}", SortDirection::Descending), "desc");
    }

    #[test]
    fn test_item_range_len() {
        assert_eq!(ItemRange::new(0, 0).len(), 1);
        assert_eq!(ItemRange::new(10, 19).len(), 10);
        assert_eq!(ItemRange::new(5, 2).len(), 0);
        assert!(ItemRange::new(5, 2).is_empty());
    }
}
