//! Storage abstraction behind a REST resource
//!
//! The REST layer never touches persistence directly. It talks to a [`Store`]:
//! six asynchronous calls (create, read, update, delete, query, count), each
//! keyed by the resource's id field name.
//!
//! - [`Store`]: the backend contract
//! - [`MemoryStore`]: an in-process implementation, used by the bundled binary
//! - [`Filters`], [`SortSpec`], [`ItemRange`]: the query directive parts a store receives
//! - [`StoreError`]: structured failure returned by any store call

mod directive;
mod error;
mod memory;
mod traits;

pub use directive::{Filters, ItemRange, SortDirection, SortSpec};
pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::MemoryStore;
pub use traits::{sort_document, Entity, Store, StoreResult};
