//! Error types for the favorites store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The store actor is no longer running.
    #[error("Favorites store closed")]
    StoreClosed,

    #[error("Favorites store dropped response channel")]
    StoreDropped,

    #[error("Favorites persistence I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Favorites document error: {0}")]
    Serialize(#[from] serde_json::Error),
}
