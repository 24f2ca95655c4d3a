//! Store error types
//!
//! Every [`Store`](super::Store) call resolves to either its result or a
//! [`StoreError`]. Handlers never inspect the error beyond passing it up the
//! request pipeline, so the structure here exists for logging and for the
//! pipeline's final status decision.
//!
//! # Example
//!
//! ```rust
//! use json_rest_store::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::timeout(StoreOperation::Query, "backend did not answer in 5s");
//! assert!(matches!(error.kind, StoreErrorKind::Timeout));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Store call that produced the error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Inserting a new entity
    Create,
    /// Reading one entity by id
    Read,
    /// Replacing one entity by id
    Update,
    /// Removing one entity by id
    Delete,
    /// Listing entities matching filters
    Query,
    /// Counting entities matching filters
    Count,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Query => write!(f, "query"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// An entity with the same id already exists
    AlreadyExists,
    /// Could not reach the backend
    ConnectionFailed,
    /// The backend did not answer in time
    Timeout,
    /// The backend rejected or failed the operation
    Backend,
    /// A document could not be encoded or decoded
    Serialization,
    /// Anything else
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Backend => write!(f, "backend"),
            Self::Serialization => write!(f, "serialization"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The store call that failed
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Id field (collection) involved
    pub id_field: Option<String>,
    /// Id of the entity involved
    pub entity_id: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(
        operation: StoreOperation,
        kind: StoreErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            id_field: None,
            entity_id: None,
        }
    }

    /// Create an "already exists" error for a duplicate id
    ///
    /// ```rust
    /// use json_rest_store::store::StoreError;
    ///
    /// let error = StoreError::already_exists("id", "42");
    /// assert_eq!(error.entity_id.as_deref(), Some("42"));
    /// ```
    pub fn already_exists(id_field: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(
            StoreOperation::Create,
            StoreErrorKind::AlreadyExists,
            "Entity already exists",
        )
        .with_entity(id_field, id)
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Timeout, message)
    }

    /// Create a backend error
    pub fn backend(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Backend, message)
    }

    /// Create a serialization error
    pub fn serialization(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Serialization, message)
    }

    /// Attach the id field and entity id
    #[must_use]
    pub fn with_entity(mut self, id_field: impl Into<String>, id: impl Into<String>) -> Self {
        self.id_field = Some(id_field.into());
        self.entity_id = Some(id.into());
        self
    }

    /// Transient errors that may succeed if the client tries again.
    ///
    /// This layer never retries; the flag only feeds logging and the status
    /// chosen by the error response.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(id_field), Some(id)) = (&self.id_field, &self.entity_id) {
            write!(f, " [{}: {}]", id_field, id)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}
