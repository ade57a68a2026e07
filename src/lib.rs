//! # Catalog Browser
//!
//! > **Location-aware browsing over a remote character catalog.**
//!
//! This crate lists, searches and inspects characters from a REST catalog
//! (by default the public Rick and Morty API). Beyond plain paged listing it
//! answers two location questions:
//!
//! - *who lives at the first location matching this name?* (listing filter)
//! - *who else comes from this character's origin?* (detail view)
//!
//! Both are answered by turning a location's resident references into ids and
//! fetching them in bounded, concurrent batches.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### The catalog is a port
//! Everything talks to the catalog through the [`CatalogApi`](catalog::CatalogApi)
//! trait. Production uses [`HttpCatalog`](catalog::HttpCatalog); tests use
//! [`MockCatalog`](catalog::mock::MockCatalog), which serves fixtures, records
//! every call and can be scripted to fail.
//!
//! ### 404 means "nothing here"
//! A missing location, an empty search or an unmatched filter is not an error
//! for a listing. `NotFound` is folded to an empty result at the pipeline and
//! listing boundaries; every other failure propagates unchanged so the caller
//! can offer a retry.
//!
//! ### Deterministic neighbors
//! The same-origin neighbors of a character are shuffled with a seeded
//! generator, so a given character always shows the same order.
//!
//! ### Favorites are an actor
//! The favorites store is a Tokio task owning its map, reached through a
//! cloneable [`FavoritesClient`](favorites::FavoritesClient). Persistence is a
//! trait, so the store runs against a JSON file or memory alike.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Catalog payloads and the reference → id extractor.
//!
//! ### 2. The Port ([`catalog`])
//! The [`CatalogApi`](catalog::CatalogApi) trait, its HTTP implementation, the
//! mock, queries and [`CatalogError`](catalog::CatalogError).
//!
//! ### 3. The Pipeline ([`resolver`])
//! - [`BatchResolver`](resolver::BatchResolver): references → characters in
//!   concurrent chunks of at most 20, order preserved.
//! - [`LocationPipeline`](resolver::LocationPipeline): location name or origin
//!   → residents, plus the character detail view.
//! - [`shuffle`](resolver::shuffle()): seeded mulberry32 shuffle.
//!
//! ### 4. The Listing ([`listing`])
//! [`ListingController`](listing::ListingController) switches between direct
//! and location mode; [`ListingSession`](listing::ListingSession) adds
//! debounced filters, page changes and retries.
//!
//! ### 5. The Store ([`favorites`])
//! Favorites actor, client and persistence backends.
//!
//! ### 6. The Orchestrator ([`runtime`])
//! [`BrowserSystem`](runtime::BrowserSystem) wires everything together from a
//! [`BrowserConfig`](runtime::BrowserConfig); also cancellation, debounce and
//! tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- list --location earth
//! cargo run -- show 1
//! cargo run -- favorites toggle 1
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod catalog;
pub mod favorites;
pub mod listing;
pub mod model;
pub mod resolver;
pub mod runtime;
