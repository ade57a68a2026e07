//! Two-mode character listing.
//!
//! Without a location filter the catalog does the filtering and paging
//! ([`ListingMode::Direct`]). With one, the listing is the residents of the
//! first matching location, filtered by name and species and paged locally
//! ([`ListingMode::Location`]).

use tracing::{debug, info, instrument, warn};

use super::filters::{ListingFilters, ListingMode};
use super::page::PagedResult;
use crate::catalog::{not_found_as_empty, CatalogError, CharacterQuery};
use crate::model::CharacterRecord;
use crate::resolver::LocationPipeline;
use crate::runtime::cancel::{cancellable, CancellationToken};

/// What the listing view renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Loading,
    /// A page of results. A 404 from the catalog lands here as an empty page.
    Ready(PagedResult<CharacterRecord>),
    /// Any other failure; the view offers a retry.
    Failed(CatalogError),
}

impl ListingState {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListingState::Failed(e) if *e != CatalogError::Cancelled)
    }

    pub fn result(&self) -> Option<&PagedResult<CharacterRecord>> {
        match self {
            ListingState::Ready(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ListingController {
    pipeline: LocationPipeline,
    filters: ListingFilters,
    page: u32,
}

impl ListingController {
    pub fn new(pipeline: LocationPipeline) -> Self {
        Self {
            pipeline,
            filters: ListingFilters::default(),
            page: 1,
        }
    }

    pub fn filters(&self) -> &ListingFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn mode(&self) -> ListingMode {
        self.filters.mode()
    }

    /// Replaces the filters. Any change sends the listing back to page 1.
    /// Returns whether anything changed.
    pub fn set_filters(&mut self, filters: ListingFilters) -> bool {
        if filters == self.filters {
            return false;
        }
        debug!(?filters, "Filters changed");
        self.filters = filters;
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// The direct-mode catalog query for the current state.
    pub fn query(&self) -> CharacterQuery {
        CharacterQuery::new(
            self.page,
            self.filters.name.trim(),
            self.filters.species.trim(),
        )
    }

    #[instrument(skip(self, cancel), fields(mode = ?self.mode(), page = self.page))]
    pub async fn load(&self, cancel: &CancellationToken) -> ListingState {
        let loaded = match self.mode() {
            ListingMode::Direct => self.load_direct(cancel).await,
            ListingMode::Location => self.load_location(cancel).await,
        };
        match not_found_as_empty(loaded.map(Some)) {
            Ok(Some(result)) => {
                info!(
                    total_pages = result.total_pages(),
                    shown = result.items().len(),
                    "Listing loaded"
                );
                ListingState::Ready(result)
            }
            Ok(None) => {
                info!("No results");
                ListingState::Ready(PagedResult::empty())
            }
            Err(e) => {
                warn!(error = %e, "Listing failed");
                ListingState::Failed(e)
            }
        }
    }

    /// Re-runs the last load; the retry affordance of a failed listing.
    pub async fn retry(&self, cancel: &CancellationToken) -> ListingState {
        self.load(cancel).await
    }

    async fn load_direct(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<CharacterRecord>, CatalogError> {
        let query = self.query();
        let page = cancellable(cancel, self.pipeline.catalog().characters_page(&query)).await?;
        Ok(PagedResult::server(page.info.pages, page.results))
    }

    async fn load_location(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<CharacterRecord>, CatalogError> {
        let residents = self
            .pipeline
            .residents_by_name(&self.filters.location, cancel)
            .await?;
        let filtered = self.filters.apply(residents);
        Ok(PagedResult::client(filtered, self.page))
    }
}
