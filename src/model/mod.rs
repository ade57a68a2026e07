//! Catalog data types as they come off the wire.

pub mod character;
pub mod location;
pub mod reference;

pub use character::*;
pub use location::*;
pub use reference::*;
