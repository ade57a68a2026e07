//! The transport boundary: the [`CatalogApi`] port and its adapters.

pub mod api;
pub mod error;
pub mod http;
pub mod mock;
pub mod query;

pub use api::*;
pub use error::*;
pub use http::*;
pub use query::*;
