//! Binding resources to routes
//!
//! Each resource gets two paths, the collection (`/users`) and the item
//! (`/users/{id}`, with the capture named after the id field). Every method in
//! the table below is always routed; a disabled operation routes to
//! [`not_allowed`](super::handlers::not_allowed) instead of its handler.
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | collection | Query |
//! | POST | collection | Create |
//! | GET | item | Read |
//! | PUT | item | Update |
//! | PATCH, POST | item | Append |
//! | DELETE | item | Delete |

use std::sync::Arc;

use axum::{
    handler::Handler,
    routing::{MethodFilter, MethodRouter},
    Router,
};

use super::handlers::{self, ResourceContext};
use super::operations::{Operation, OperationSet};
use super::query::QueryTranslator;
use crate::store::Store;

/// Builder that exposes a [`Store`] as REST resources
///
/// ```rust
/// use json_rest_store::rest::{JsonRestStore, Operation, OperationSet};
/// use json_rest_store::store::MemoryStore;
///
/// let router: axum::Router = JsonRestStore::new(MemoryStore::new())
///     .with_sort_param("sortBy")
///     .rest("/users", "id")
///     .rest_with("/audit", "seq", OperationSet::from([Operation::Query, Operation::Read]))
///     .into_router();
/// ```
pub struct JsonRestStore<S> {
    store: Arc<S>,
    translator: QueryTranslator,
    router: Router,
}

impl<S: Store + 'static> JsonRestStore<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Use a store that is also shared elsewhere
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            translator: QueryTranslator::new(),
            router: Router::new(),
        }
    }

    /// Read the sort from the query parameter `name` instead of `sort(...)`
    /// keys
    ///
    /// Applies to resources bound after this call.
    #[must_use]
    pub fn with_sort_param(mut self, name: impl Into<String>) -> Self {
        self.translator = QueryTranslator::with_sort_param(name);
        self
    }

    /// Bind `path` with all six operations enabled
    #[must_use]
    pub fn rest(self, path: &str, id_field: &str) -> Self {
        self.rest_with(path, id_field, OperationSet::all())
    }

    /// Bind `path` with only `operations` enabled
    ///
    /// A trailing `/` on `path` is ignored.
    ///
    /// # Panics
    ///
    /// Panics if the resulting routes are invalid or overlap with an already
    /// bound resource, as [`Router::route`] does.
    #[must_use]
    pub fn rest_with(mut self, path: &str, id_field: &str, operations: OperationSet) -> Self {
        let base = path.strip_suffix('/').unwrap_or(path);
        let collection_path = if base.is_empty() { "/" } else { base };
        let item_path = format!("{}/{{{}}}", base, id_field);

        let ctx = ResourceContext::new(
            Arc::clone(&self.store),
            id_field,
            self.translator.clone(),
        );
        let allow = |operation| operations.contains(operation);

        let collection = MethodRouter::new();
        let collection = on_or_405(
            collection,
            allow(Operation::Query),
            MethodFilter::GET,
            handlers::query::<S>,
        );
        let collection = on_or_405(
            collection,
            allow(Operation::Create),
            MethodFilter::POST,
            handlers::create::<S>,
        );

        let item = MethodRouter::new();
        let item = on_or_405(
            item,
            allow(Operation::Read),
            MethodFilter::GET,
            handlers::read::<S>,
        );
        let item = on_or_405(
            item,
            allow(Operation::Update),
            MethodFilter::PUT,
            handlers::update::<S>,
        );
        let item = on_or_405(
            item,
            allow(Operation::Append),
            MethodFilter::PATCH.or(MethodFilter::POST),
            handlers::append::<S>,
        );
        let item = on_or_405(
            item,
            allow(Operation::Delete),
            MethodFilter::DELETE,
            handlers::delete::<S>,
        );

        for disabled in Operation::ALL.into_iter().filter(|op| !allow(*op)) {
            tracing::debug!(path = collection_path, operation = %disabled, "Operation disabled");
        }
        tracing::info!(
            path = collection_path,
            item_path = %item_path,
            id_field,
            operations = ?operations,
            "Bound REST resource"
        );

        let resource = Router::new()
            .route(collection_path, collection)
            .route(&item_path, item)
            .with_state(ctx);
        self.router = self.router.merge(resource);
        self
    }

    /// The router serving every bound resource
    pub fn into_router(self) -> Router {
        self.router
    }
}

fn on_or_405<S, H, T>(
    router: MethodRouter<ResourceContext<S>>,
    enabled: bool,
    filter: MethodFilter,
    handler: H,
) -> MethodRouter<ResourceContext<S>>
where
    S: Store + 'static,
    H: Handler<T, ResourceContext<S>>,
    T: 'static,
{
    if enabled {
        router.on(filter, handler)
    } else {
        router.on(filter, handlers::not_allowed)
    }
}
