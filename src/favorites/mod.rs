//! The favorites store: an actor-owned map of favorite characters with a
//! swappable persistence backend.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod persistence;

pub use actor::*;
pub use client::*;
pub use entity::*;
pub use error::*;
pub use persistence::*;

use tokio::sync::{broadcast, mpsc};

const REQUEST_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Creates the favorites actor and its client, loading any saved favorites.
pub fn new(
    persistence: impl FavoritesPersistence,
) -> Result<(FavoritesActor, FavoritesClient), FavoritesError> {
    let (sender, receiver) = mpsc::channel(REQUEST_BUFFER);
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let actor = FavoritesActor::new(receiver, Box::new(persistence), events.clone())?;
    Ok((actor, FavoritesClient::new(sender, events)))
}
