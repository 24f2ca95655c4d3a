//! The `Store` trait consumed by the REST handlers
//!
//! Methods return `impl Future + Send` (RPITIT), so implementations can be
//! written with plain `async fn` and no `async_trait`.
//!
//! Every method takes the resource's id field name first. A store uses it to
//! pick the collection and to know which document field carries the id, so the
//! same string flows from the route's path parameter down to the backend.

use std::future::Future;

use serde_json::{Map, Value};

use super::directive::{Filters, ItemRange, SortSpec};
use super::error::StoreError;

/// A stored document: a JSON object
pub type Entity = Map<String, Value>;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Pluggable document backend
///
/// Each call completes exactly once with either its result or a
/// [`StoreError`]. Timeouts, retries and consistency across concurrent
/// requests on the same id are the store's concern.
///
/// # Example
///
/// ```rust,ignore
/// use json_rest_store::store::{Entity, Filters, ItemRange, SortSpec, Store, StoreResult};
///
/// struct MongoStore { /* ... */ }
///
/// impl Store for MongoStore {
///     async fn read(&self, id_field: &str, id: &str) -> StoreResult<Option<Entity>> {
///         let collection = self.db.collection(id_field);
///         // ...
///     }
///     // ... other methods
/// }
/// ```
pub trait Store: Send + Sync {
    /// Insert `entity` and return the id it was stored under
    fn create(
        &self,
        id_field: &str,
        entity: Entity,
    ) -> impl Future<Output = StoreResult<String>> + Send;

    /// Fetch one entity; `Ok(None)` when no entity has that id
    fn read(
        &self,
        id_field: &str,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<Entity>>> + Send;

    /// Replace the entity with that id; returns the number of entities matched
    fn update(
        &self,
        id_field: &str,
        id: &str,
        entity: Entity,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Remove the entity with that id; returns the number of entities matched
    fn delete(&self, id_field: &str, id: &str) -> impl Future<Output = StoreResult<u64>> + Send;

    /// List entities matching every filter, sorted, optionally windowed
    fn query(
        &self,
        id_field: &str,
        filters: &Filters,
        range: Option<ItemRange>,
        sort: &SortSpec,
    ) -> impl Future<Output = StoreResult<Vec<Entity>>> + Send;

    /// Count entities matching every filter
    fn count(
        &self,
        id_field: &str,
        filters: &Filters,
    ) -> impl Future<Output = StoreResult<u64>> + Send;
}

/// Render a sort specification the way document stores expect it:
/// `{"field": 1, "other": -1}`
///
/// ```rust
/// use json_rest_store::store::{sort_document, SortDirection, SortSpec};
///
/// let mut sort = SortSpec::new();
/// sort.insert("a", SortDirection::Ascending);
/// sort.insert("b", SortDirection::Descending);
///
/// assert_eq!(sort_document(&sort).to_string(), r#"{"a":1,"b":-1}"#);
/// ```
pub fn sort_document(sort: &SortSpec) -> Value {
    let mut document = Map::new();
    for (field, direction) in sort.iter() {
        document.insert(field.to_string(), Value::from(direction.as_i8()));
    }
    Value::Object(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortDirection;

    #[test]
    fn test_sort_document_directions() {
        let mut sort = SortSpec::new();
        sort.insert("z", SortDirection::Descending);
        sort.insert("a", SortDirection::Ascending);
        let document = sort_document(&sort);
        assert_eq!(document["z"], Value::from(-1));
        assert_eq!(document["a"], Value::from(1));
        assert_eq!(document.as_object().map(Map::len), Some(2));
    }

    #[test]
    fn test_sort_document_empty() {
        assert_eq!(sort_document(&SortSpec::new()), Value::Object(Map::new()));
    }
}
