//! A scripted [`Store`] that records every call it receives

use std::sync::Mutex;

use serde_json::Value;

use crate::store::{
    Entity, Filters, ItemRange, SortSpec, Store, StoreError, StoreOperation, StoreResult,
};

pub(crate) fn entity(value: Value) -> Entity {
    value
        .as_object()
        .cloned()
        .expect("test entity must be a JSON object")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create {
        id_field: String,
        entity: Entity,
    },
    Read {
        id_field: String,
        id: String,
    },
    Update {
        id_field: String,
        id: String,
        entity: Entity,
    },
    Delete {
        id_field: String,
        id: String,
    },
    Query {
        id_field: String,
        filters: Filters,
        range: Option<ItemRange>,
        sort: SortSpec,
    },
    Count {
        id_field: String,
        filters: Filters,
    },
}

pub(crate) struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    created_id: String,
    stored: Option<Entity>,
    matched: u64,
    entities: Vec<Entity>,
    total: u64,
    failure: Option<(StoreOperation, StoreError)>,
}

impl RecordingStore {
    /// Creates answer `new-id`, reads find nothing, updates and deletes match
    /// one entity, queries return nothing
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            created_id: "new-id".to_string(),
            stored: None,
            matched: 1,
            entities: Vec::new(),
            total: 0,
            failure: None,
        }
    }

    pub(crate) fn with_created_id(mut self, id: &str) -> Self {
        self.created_id = id.to_string();
        self
    }

    pub(crate) fn with_stored(mut self, entity: Entity) -> Self {
        self.stored = Some(entity);
        self
    }

    pub(crate) fn with_matched(mut self, matched: u64) -> Self {
        self.matched = matched;
        self
    }

    pub(crate) fn with_entities(mut self, entities: Vec<Entity>, total: u64) -> Self {
        self.entities = entities;
        self.total = total;
        self
    }

    pub(crate) fn failing(mut self, operation: StoreOperation, error: StoreError) -> Self {
        self.failure = Some((operation, error));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record<T>(&self, operation: StoreOperation, call: Call, ok: T) -> StoreResult<T> {
        self.calls.lock().expect("call log poisoned").push(call);
        match &self.failure {
            Some((failing, error)) if *failing == operation => Err(error.clone()),
            _ => Ok(ok),
        }
    }
}

impl Store for RecordingStore {
    async fn create(&self, id_field: &str, entity: Entity) -> StoreResult<String> {
        let call = Call::Create {
            id_field: id_field.to_string(),
            entity,
        };
        self.record(StoreOperation::Create, call, self.created_id.clone())
    }

    async fn read(&self, id_field: &str, id: &str) -> StoreResult<Option<Entity>> {
        let call = Call::Read {
            id_field: id_field.to_string(),
            id: id.to_string(),
        };
        self.record(StoreOperation::Read, call, self.stored.clone())
    }

    async fn update(&self, id_field: &str, id: &str, entity: Entity) -> StoreResult<u64> {
        let call = Call::Update {
            id_field: id_field.to_string(),
            id: id.to_string(),
            entity,
        };
        self.record(StoreOperation::Update, call, self.matched)
    }

    async fn delete(&self, id_field: &str, id: &str) -> StoreResult<u64> {
        let call = Call::Delete {
            id_field: id_field.to_string(),
            id: id.to_string(),
        };
        self.record(StoreOperation::Delete, call, self.matched)
    }

    async fn query(
        &self,
        id_field: &str,
        filters: &Filters,
        range: Option<ItemRange>,
        sort: &SortSpec,
    ) -> StoreResult<Vec<Entity>> {
        let call = Call::Query {
            id_field: id_field.to_string(),
            filters: filters.clone(),
            range,
            sort: sort.clone(),
        };
        self.record(StoreOperation::Query, call, self.entities.clone())
    }

    async fn count(&self, id_field: &str, filters: &Filters) -> StoreResult<u64> {
        let call = Call::Count {
            id_field: id_field.to_string(),
            filters: filters.clone(),
        };
        self.record(StoreOperation::Count, call, self.total)
    }
}
