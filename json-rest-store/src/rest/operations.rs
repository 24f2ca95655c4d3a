//! Operations a bound resource can expose
//!
//! # Example
//!
//! ```rust
//! use json_rest_store::rest::{Operation, OperationSet};
//!
//! let read_only = OperationSet::from([Operation::Query, Operation::Read]);
//! assert!(read_only.contains(Operation::Read));
//! assert!(!read_only.contains(Operation::Delete));
//! assert_eq!(OperationSet::all().len(), 6);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One REST operation on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `GET /resource`
    Query,
    /// `GET /resource/{id}`
    Read,
    /// `PUT /resource/{id}`
    Update,
    /// `PATCH /resource/{id}` and `POST /resource/{id}`
    Append,
    /// `POST /resource`
    Create,
    /// `DELETE /resource/{id}`
    Delete,
}

impl Operation {
    /// Every operation, in binding order
    pub const ALL: [Operation; 6] = [
        Self::Query,
        Self::Read,
        Self::Update,
        Self::Append,
        Self::Create,
        Self::Delete,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Query => 1,
            Self::Read => 1 << 1,
            Self::Update => 1 << 2,
            Self::Append => 1 << 3,
            Self::Create => 1 << 4,
            Self::Delete => 1 << 5,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Read => "read",
            Self::Update => "update",
            Self::Append => "append",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operation name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation '{0}', expected one of query, read, update, append, create, delete")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Enabled subset of [`Operation`]s, fixed once a resource is bound
///
/// Serializes as a list of operation names.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationSet(u8);

impl OperationSet {
    /// No operations: every route answers 405
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All six operations
    #[must_use]
    pub const fn all() -> Self {
        Self(0b11_1111)
    }

    #[must_use]
    pub const fn with(self, operation: Operation) -> Self {
        Self(self.0 | operation.bit())
    }

    #[must_use]
    pub const fn without(self, operation: Operation) -> Self {
        Self(self.0 & !operation.bit())
    }

    #[must_use]
    pub const fn contains(&self, operation: Operation) -> bool {
        self.0 & operation.bit() == operation.bit()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Enabled operations in binding order
    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL.into_iter().filter(|op| self.contains(*op))
    }
}

impl Default for OperationSet {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<const N: usize> From<[Operation; N]> for OperationSet {
    fn from(operations: [Operation; N]) -> Self {
        operations.into_iter().collect()
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Serialize for OperationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for OperationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| name.parse::<Operation>())
            .collect::<Result<OperationSet, _>>()
            .map_err(serde::de::Error::custom)
    }
}
