use std::collections::BTreeMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

use super::actor::FavoritesRequest;
use super::entity::{FavoriteSnapshot, FavoritesEvent};
use super::error::FavoritesError;
use crate::model::CharacterRecord;

/// Handle to the favorites actor. Cheap to clone; the actor stops once every
/// clone is dropped.
#[derive(Clone)]
pub struct FavoritesClient {
    sender: mpsc::Sender<FavoritesRequest>,
    events: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesClient {
    pub(super) fn new(
        sender: mpsc::Sender<FavoritesRequest>,
        events: broadcast::Sender<FavoritesEvent>,
    ) -> Self {
        Self { sender, events }
    }

    pub async fn is_favorite(&self, id: u32) -> Result<bool, FavoritesError> {
        let (respond_to, response) = oneshot::channel();
        self.send(FavoritesRequest::IsFavorite { id, respond_to })
            .await?;
        response.await.map_err(|_| FavoritesError::StoreDropped)
    }

    /// Adds `record` if absent, removes it otherwise. Returns whether it is a
    /// favorite afterwards.
    #[instrument(skip(self, record), fields(id = record.id))]
    pub async fn toggle(&self, record: &CharacterRecord) -> Result<bool, FavoritesError> {
        debug!("Sending request");
        self.toggle_snapshot(FavoriteSnapshot::from(record)).await
    }

    pub async fn toggle_snapshot(
        &self,
        snapshot: FavoriteSnapshot,
    ) -> Result<bool, FavoritesError> {
        let (respond_to, response) = oneshot::channel();
        self.send(FavoritesRequest::Toggle { snapshot, respond_to })
            .await?;
        response.await.map_err(|_| FavoritesError::StoreDropped)?
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), FavoritesError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(FavoritesRequest::Clear { respond_to }).await?;
        response.await.map_err(|_| FavoritesError::StoreDropped)?
    }

    /// All favorites keyed by id.
    pub async fn snapshot(&self) -> Result<BTreeMap<u32, FavoriteSnapshot>, FavoritesError> {
        let (respond_to, response) = oneshot::channel();
        self.send(FavoritesRequest::Snapshot { respond_to }).await?;
        response.await.map_err(|_| FavoritesError::StoreDropped)
    }

    /// Notifications for every committed change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.events.subscribe()
    }

    async fn send(&self, request: FavoritesRequest) -> Result<(), FavoritesError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| FavoritesError::StoreClosed)
    }
}
