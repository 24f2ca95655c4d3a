//! Request handlers for a bound resource
//!
//! One async function per operation, all generic over the [`Store`] and
//! sharing a per-resource [`ResourceContext`]. Store failures are returned as
//! [`Error`] and rendered by its `IntoResponse` impl; handlers only decide the
//! success and not-found responses.
//!
//! | Operation | Store calls | Outcome |
//! |---|---|---|
//! | query | `query`, then `count` when ranged | 200 JSON array, `Content-Range` when ranged |
//! | read | `read` | 200 entity, 404 when absent |
//! | create | `create` | 201 with `Location` |
//! | update | `update` | 204, 404 when nothing matched |
//! | append | `read`, then `update` | 204, 404 when absent or nothing matched |
//! | delete | `delete` | 204, 404 when nothing matched |

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::query::QueryTranslator;
use crate::error::{Error, Result};
use crate::store::{sort_document, Entity, Store};

/// Bytes escaped when an id becomes one path segment of a `Location`
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Configuration shared by the handlers of one resource
///
/// Built once when the resource is bound and never mutated afterwards.
pub struct ResourceContext<S> {
    store: Arc<S>,
    id_field: Arc<str>,
    translator: QueryTranslator,
}

impl<S> ResourceContext<S> {
    pub fn new(store: Arc<S>, id_field: impl Into<Arc<str>>, translator: QueryTranslator) -> Self {
        Self {
            store,
            id_field: id_field.into(),
            translator,
        }
    }

    /// Name of the field (and path parameter) that identifies entities
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn path_id<'a>(&self, params: &'a HashMap<String, String>) -> Result<&'a str> {
        params
            .get(self.id_field())
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Internal(format!("route has no '{}' path parameter", self.id_field))
            })
    }
}

impl<S> Clone for ResourceContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            id_field: Arc::clone(&self.id_field),
            translator: self.translator.clone(),
        }
    }
}

/// Answers 405 for any request, without looking at it
pub async fn not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

/// `GET /resource`
pub async fn query<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response> {
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let directive = ctx.translator.translate(&params, range);

    tracing::debug!(
        id_field = ctx.id_field(),
        filters = ?directive.filters,
        sort = %sort_document(&directive.sort),
        range = ?directive.range,
        "Querying resource"
    );

    let entities = ctx
        .store
        .query(
            ctx.id_field(),
            &directive.filters,
            directive.range.as_ref().map(|range| range.items),
            &directive.sort,
        )
        .await?;

    let Some(range) = &directive.range else {
        return Ok(Json(entities).into_response());
    };

    let total = ctx.store.count(ctx.id_field(), &directive.filters).await?;
    let content_range = HeaderValue::from_str(&range.content_range(total))
        .map_err(|e| Error::Internal(e.to_string()))?;

    tracing::debug!(returned = entities.len(), total, "Ranged query complete");
    Ok(([(header::CONTENT_RANGE, content_range)], Json(entities)).into_response())
}

/// `GET /resource/{id}`
pub async fn read<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Response> {
    let id = ctx.path_id(&params)?;

    match ctx.store.read(ctx.id_field(), id).await? {
        Some(entity) => Ok(Json(entity).into_response()),
        None => {
            tracing::debug!(id_field = ctx.id_field(), id, "Entity not found");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}

/// `POST /resource`
pub async fn create<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<Response> {
    let entity = json_object(&body).ok_or_else(Error::invalid_body)?;

    let id = ctx.store.create(ctx.id_field(), entity).await?;
    let location = location(uri.path(), &id)?;

    tracing::debug!(id_field = ctx.id_field(), id = %id, "Created entity");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// `PUT /resource/{id}`: full replacement
pub async fn update<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    Path(params): Path<HashMap<String, String>>,
    body: Bytes,
) -> Result<StatusCode> {
    let entity = json_object(&body).ok_or_else(Error::invalid_body)?;
    let id = ctx.path_id(&params)?;

    let matched = ctx.store.update(ctx.id_field(), id, entity).await?;
    tracing::debug!(id_field = ctx.id_field(), id, matched, "Replaced entity");
    Ok(matched_status(matched))
}

/// `PATCH /resource/{id}` and `POST /resource/{id}`: shallow merge into the
/// stored entity
pub async fn append<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let id = ctx.path_id(&params)?;

    let Some(existing) = ctx.store.read(ctx.id_field(), id).await? else {
        tracing::debug!(id_field = ctx.id_field(), id, "Entity not found");
        return Ok(StatusCode::NOT_FOUND);
    };

    // Recognized but not enforced: the merge below is unconditional.
    let overwrite = overwrite_preference(&headers);
    let patch = json_object(&body).ok_or_else(Error::invalid_body)?;
    let merged = merge(existing, patch);

    let matched = ctx.store.update(ctx.id_field(), id, merged).await?;
    tracing::debug!(
        id_field = ctx.id_field(),
        id,
        matched,
        overwrite = ?overwrite,
        "Merged into entity"
    );
    Ok(matched_status(matched))
}

/// `DELETE /resource/{id}`
pub async fn delete<S: Store>(
    State(ctx): State<ResourceContext<S>>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<StatusCode> {
    let id = ctx.path_id(&params)?;

    let matched = ctx.store.delete(ctx.id_field(), id).await?;
    tracing::debug!(id_field = ctx.id_field(), id, matched, "Deleted entity");
    Ok(matched_status(matched))
}

/// `<collection path>/<escaped id>`; the escaped form is always a valid header
fn location(collection: &str, id: &str) -> Result<HeaderValue> {
    let location = format!("{}/{}", collection, utf8_percent_encode(id, PATH_SEGMENT));
    HeaderValue::from_str(&location).map_err(|e| Error::Internal(e.to_string()))
}

/// The body as a JSON object; `None` for an empty body, malformed JSON or any
/// other JSON value
fn json_object(body: &[u8]) -> Option<Entity> {
    serde_json::from_slice(body).ok()
}

fn matched_status(matched: u64) -> StatusCode {
    if matched == 0 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Body keys overwrite stored keys; stored-only keys are kept
fn merge(mut existing: Entity, patch: Entity) -> Entity {
    for (key, value) in patch {
        existing.insert(key, value);
    }
    existing
}

/// `If-Match: *` asks to overwrite, `If-None-Match: *` asks not to; the latter
/// wins when both are sent
fn overwrite_preference(headers: &HeaderMap) -> Option<bool> {
    let is_wildcard = |name: header::HeaderName| {
        headers
            .get(name)
            .is_some_and(|value| value.as_bytes() == b"*")
    };

    if is_wildcard(header::IF_NONE_MATCH) {
        Some(false)
    } else if is_wildcard(header::IF_MATCH) {
        Some(true)
    } else {
        None
    }
}
