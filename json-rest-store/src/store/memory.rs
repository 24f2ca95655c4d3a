//! In-process [`Store`] backed by ordered maps
//!
//! Collections are keyed by id field name, so two resources bound with
//! different id fields never see each other's documents. Within a collection
//! documents are kept in id order, which is also the order `query` returns when
//! no sort is requested.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tokio::sync::RwLock;

use super::directive::{Filters, ItemRange, SortDirection, SortSpec};
use super::error::{StoreError, StoreOperation};
use super::traits::{Entity, Store, StoreResult};

type Collection = BTreeMap<String, Entity>;

/// Thread-safe in-memory document store
///
/// ```rust
/// use json_rest_store::store::{MemoryStore, Store};
/// use serde_json::json;
///
/// # tokio_test_block(async {
/// let store = MemoryStore::new();
/// let entity = json!({"id": "ada", "name": "Ada"}).as_object().cloned().unwrap();
/// let id = store.create("id", entity).await.unwrap();
/// assert_eq!(id, "ada");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held for `id_field`
    pub async fn len(&self, id_field: &str) -> usize {
        self.collections
            .read()
            .await
            .get(id_field)
            .map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, id_field: &str) -> bool {
        self.len(id_field).await == 0
    }
}

impl Store for MemoryStore {
    async fn create(&self, id_field: &str, mut entity: Entity) -> StoreResult<String> {
        let id = match entity.get(id_field) {
            None | Some(Value::Null) => {
                let id = uuid::Uuid::new_v4().to_string();
                entity.insert(id_field.to_string(), Value::String(id.clone()));
                id
            }
            Some(value) => id_text(value).ok_or_else(|| {
                StoreError::serialization(
                    StoreOperation::Create,
                    format!("Field '{}' must be a string or number", id_field),
                )
            })?,
        };

        let mut collections = self.collections.write().await;
        let collection = collections.entry(id_field.to_string()).or_default();
        if collection.contains_key(&id) {
            return Err(StoreError::already_exists(id_field, id));
        }
        collection.insert(id.clone(), entity);

        tracing::debug!(id_field, id = %id, "Stored new entity");
        Ok(id)
    }

    async fn read(&self, id_field: &str, id: &str) -> StoreResult<Option<Entity>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(id_field)
            .and_then(|collection| collection.get(id))
            .cloned())
    }

    async fn update(&self, id_field: &str, id: &str, mut entity: Entity) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(id_field)
            .and_then(|collection| collection.get_mut(id))
        else {
            return Ok(0);
        };

        // The stored id value wins over whatever the replacement carries.
        let stored_id = existing
            .get(id_field)
            .cloned()
            .unwrap_or_else(|| Value::String(id.to_string()));
        entity.insert(id_field.to_string(), stored_id);
        *existing = entity;
        Ok(1)
    }

    async fn delete(&self, id_field: &str, id: &str) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(id_field)
            .and_then(|collection| collection.remove(id));
        Ok(u64::from(removed.is_some()))
    }

    async fn query(
        &self,
        id_field: &str,
        filters: &Filters,
        range: Option<ItemRange>,
        sort: &SortSpec,
    ) -> StoreResult<Vec<Entity>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Entity> = collections
            .get(id_field)
            .into_iter()
            .flat_map(|collection| collection.values())
            .filter(|entity| matches_filters(entity, filters))
            .cloned()
            .collect();
        drop(collections);

        if !sort.is_empty() {
            matched.sort_by(|a, b| compare_entities(a, b, sort));
        }

        Ok(match range {
            Some(range) => {
                let skip = usize::try_from(range.start).unwrap_or(usize::MAX);
                let take = usize::try_from(range.len()).unwrap_or(usize::MAX);
                matched.into_iter().skip(skip).take(take).collect()
            }
            None => matched,
        })
    }

    async fn count(&self, id_field: &str, filters: &Filters) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let total = collections
            .get(id_field)
            .map_or(0, |collection| {
                collection
                    .values()
                    .filter(|entity| matches_filters(entity, filters))
                    .count()
            });
        Ok(total as u64)
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Filters compare against the field rendered as text
fn matches_filters(entity: &Entity, filters: &Filters) -> bool {
    filters.iter().all(|(field, expected)| match entity.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn compare_entities(a: &Entity, b: &Entity, sort: &SortSpec) -> Ordering {
    for (field, direction) in sort.iter() {
        let ordering = compare_fields(a.get(field), b.get(field));
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
