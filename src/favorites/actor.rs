//! The favorites actor.
//!
//! The actor owns the favorites map outright and processes requests one at a
//! time, so no locking is needed around it. Mutations are persisted before
//! they are committed: if the save fails the map is left unchanged and the
//! caller gets the error.

use std::collections::BTreeMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use super::entity::{FavoriteSnapshot, FavoritesEvent};
use super::error::FavoritesError;
use super::persistence::{FavoritesDocument, FavoritesPersistence};

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FavoritesError>>;

/// Messages understood by [`FavoritesActor`].
#[derive(Debug)]
pub enum FavoritesRequest {
    IsFavorite {
        id: u32,
        respond_to: oneshot::Sender<bool>,
    },
    Toggle {
        snapshot: FavoriteSnapshot,
        respond_to: Response<bool>,
    },
    Clear {
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: oneshot::Sender<BTreeMap<u32, FavoriteSnapshot>>,
    },
}

pub struct FavoritesActor {
    receiver: mpsc::Receiver<FavoritesRequest>,
    store: BTreeMap<u32, FavoriteSnapshot>,
    persistence: Box<dyn FavoritesPersistence>,
    events: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesActor {
    pub(super) fn new(
        receiver: mpsc::Receiver<FavoritesRequest>,
        persistence: Box<dyn FavoritesPersistence>,
        events: broadcast::Sender<FavoritesEvent>,
    ) -> Result<Self, FavoritesError> {
        let store = match persistence.load() {
            Ok(Some(document)) if document.is_current() => document.favorites,
            Ok(Some(document)) => {
                warn!(
                    key = %document.key,
                    version = document.version,
                    "Ignoring favorites from another storage version"
                );
                BTreeMap::new()
            }
            Ok(None) => BTreeMap::new(),
            Err(FavoritesError::Serialize(e)) => {
                warn!(error = %e, "Ignoring unreadable favorites document");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            receiver,
            store,
            persistence,
            events,
        })
    }

    /// Runs the event loop until every client is dropped.
    pub async fn run(mut self) {
        info!(size = self.store.len(), "Favorites actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                FavoritesRequest::IsFavorite { id, respond_to } => {
                    let found = self.store.contains_key(&id);
                    debug!(id, found, "IsFavorite");
                    let _ = respond_to.send(found);
                }
                FavoritesRequest::Toggle { snapshot, respond_to } => {
                    let id = snapshot.id;
                    let mut next = self.store.clone();
                    let added = if next.remove(&id).is_some() {
                        false
                    } else {
                        next.insert(id, snapshot);
                        true
                    };
                    match self.commit(next) {
                        Ok(()) => {
                            info!(id, added, size = self.store.len(), "Toggled");
                            let event = if added {
                                FavoritesEvent::Added(id)
                            } else {
                                FavoritesEvent::Removed(id)
                            };
                            let _ = self.events.send(event);
                            let _ = respond_to.send(Ok(added));
                        }
                        Err(e) => {
                            warn!(id, error = %e, "Toggle failed");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                FavoritesRequest::Clear { respond_to } => match self.commit(BTreeMap::new()) {
                    Ok(()) => {
                        info!("Cleared");
                        let _ = self.events.send(FavoritesEvent::Cleared);
                        let _ = respond_to.send(Ok(()));
                    }
                    Err(e) => {
                        warn!(error = %e, "Clear failed");
                        let _ = respond_to.send(Err(e));
                    }
                },
                FavoritesRequest::Snapshot { respond_to } => {
                    debug!(size = self.store.len(), "Snapshot");
                    let _ = respond_to.send(self.store.clone());
                }
            }
        }

        info!(size = self.store.len(), "Favorites actor shutdown");
    }

    fn commit(&mut self, next: BTreeMap<u32, FavoriteSnapshot>) -> Result<(), FavoritesError> {
        let document = FavoritesDocument::new(next);
        self.persistence.save(&document)?;
        self.store = document.favorites;
        Ok(())
    }
}
