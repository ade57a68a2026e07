use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::BrowserConfig;
use crate::catalog::{CatalogApi, CatalogError, HttpCatalog};
use crate::favorites::{
    self, FavoritesClient, FavoritesError, FavoritesPersistence, JsonFilePersistence,
};
use crate::listing::{ListingController, ListingFilters, ListingSession};
use crate::resolver::LocationPipeline;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Catalog setup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Favorites setup failed: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

/// Owns the running pieces of the browser and wires them together.
///
/// The catalog and the location pipeline are shared handles. The favorites
/// store runs as an actor whose task is awaited on [`shutdown`](Self::shutdown).
///
/// ```ignore
/// let system = BrowserSystem::new(&BrowserConfig::from_env()?)?;
/// let detail = system.pipeline.character_detail(1, &CancellationToken::new()).await?;
/// system.favorites.toggle(&detail.character).await?;
/// system.shutdown().await?;
/// ```
pub struct BrowserSystem {
    pub catalog: Arc<dyn CatalogApi>,
    pub pipeline: LocationPipeline,
    pub favorites: FavoritesClient,
    debounce: Duration,
    handles: Vec<JoinHandle<()>>,
}

impl BrowserSystem {
    /// Builds an HTTP-backed system with file persistence from `config`.
    pub fn new(config: &BrowserConfig) -> Result<Self, SystemError> {
        let catalog = HttpCatalog::new(config.base_url.clone(), config.request_timeout)?;
        let persistence = JsonFilePersistence::new(config.favorites_path.clone());
        info!(
            base_url = %config.base_url,
            favorites = %config.favorites_path.display(),
            "Starting browser"
        );
        Self::with_parts(Arc::new(catalog), persistence, config.debounce)
    }

    /// Builds a system around an arbitrary catalog and persistence backend.
    pub fn with_parts(
        catalog: Arc<dyn CatalogApi>,
        persistence: impl FavoritesPersistence,
        debounce: Duration,
    ) -> Result<Self, SystemError> {
        let (favorites_actor, favorites) = favorites::new(persistence)?;
        let favorites_handle = tokio::spawn(favorites_actor.run());

        Ok(Self {
            pipeline: LocationPipeline::new(Arc::clone(&catalog)),
            catalog,
            favorites,
            debounce,
            handles: vec![favorites_handle],
        })
    }

    pub fn listing(&self, filters: ListingFilters) -> ListingController {
        let mut controller = ListingController::new(self.pipeline.clone());
        controller.set_filters(filters);
        controller
    }

    /// A live listing using the configured debounce window.
    pub fn listing_session(&self, filters: ListingFilters) -> ListingSession {
        ListingSession::spawn(self.listing(filters), self.debounce)
    }

    /// Closes the favorites store and waits for its task to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down browser...");
        drop(self.favorites);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("Browser shutdown complete.");
        Ok(())
    }
}
