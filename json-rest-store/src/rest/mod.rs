//! REST binding of a [`Store`](crate::store::Store)
//!
//! [`JsonRestStore`] registers the routes, [`handlers`] implements them, and
//! [`QueryTranslator`] turns query strings into filters, sort and range.

pub mod binder;
pub mod handlers;
pub mod operations;
pub mod query;

#[cfg(test)]
pub(crate) mod test_support;

pub use binder::JsonRestStore;
pub use handlers::{not_allowed, ResourceContext};
pub use operations::{Operation, OperationSet, UnknownOperation};
pub use query::{parse_range, QueryDirective, QueryTranslator, RangeRequest};
