//! The resolution pipeline: references → ids → batched fetches → ordered,
//! filtered character lists.
//!
//! - [`reference`](crate::model::reference) turns opaque references into ids.
//! - [`batch`] fetches referenced characters in concurrent, capped batches.
//! - [`location`] resolves locations (by name or by origin) to residents.
//! - [`shuffle`] gives a stable, seeded order to origin residents.
//! - [`detail`] combines a character with its same-origin neighbors.

pub mod batch;
pub mod detail;
pub mod location;
pub mod shuffle;

pub use batch::*;
pub use detail::*;
pub use location::*;
pub use shuffle::*;
