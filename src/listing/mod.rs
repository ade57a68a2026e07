//! Character listings: mode selection, client-side filtering, pagination.

pub mod controller;
pub mod filters;
pub mod page;
pub mod session;

pub use controller::*;
pub use filters::*;
pub use page::*;
pub use session::*;
