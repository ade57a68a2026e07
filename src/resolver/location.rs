//! Location → residents.
//!
//! Two entry points share the same tail (residents → [`BatchResolver`]):
//!
//! - **by name**, for free-text location search in listings. Only the first
//!   matching location is used, and at most [`DEFAULT_MAX_ITEMS`] residents
//!   are ever fetched.
//! - **by origin**, for a character's detail view. Residents are narrowed to
//!   those sharing the central character's origin, the character itself is
//!   removed, and the rest is shuffled with the character's id as seed.
//!
//! A 404 at any step resolves to an empty list.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::batch::{BatchResolver, DEFAULT_MAX_ITEMS};
use super::shuffle::{seed_for, shuffle};
use crate::catalog::{non_blank, not_found_as_empty, CatalogApi, CatalogError};
use crate::model::{CharacterRecord, LocationRecord};
use crate::runtime::cancel::{cancellable, CancellationToken};

#[derive(Clone)]
pub struct LocationPipeline {
    catalog: Arc<dyn CatalogApi>,
    resolver: BatchResolver,
}

impl LocationPipeline {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            resolver: BatchResolver::new(Arc::clone(&catalog)),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    /// Residents of the first location whose name matches `name`.
    #[instrument(skip(self, cancel))]
    pub async fn residents_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CharacterRecord>, CatalogError> {
        let Some(name) = non_blank(name) else {
            return Ok(Vec::new());
        };
        let key = name.to_lowercase();

        let found = cancellable(cancel, self.catalog.search_locations(&key)).await;
        let locations = not_found_as_empty(found)?;
        let Some(location) = locations.into_iter().next() else {
            debug!("No matching location");
            return Ok(Vec::new());
        };
        debug!(
            location_id = location.id,
            residents = location.residents.len(),
            "Using first match"
        );

        self.resolve_residents(&location, None, cancel).await
    }

    /// Same-origin residents for `central`, shuffled with its id as seed.
    pub async fn origin_residents(
        &self,
        central: &CharacterRecord,
        cancel: &CancellationToken,
    ) -> Result<Vec<CharacterRecord>, CatalogError> {
        self.residents_of_origin(central.origin_id(), Some(central.id), cancel)
            .await
    }

    /// Residents of location `origin_id` that also originate there, minus
    /// `central_id`. An unknown origin yields nothing without any request.
    #[instrument(skip(self, cancel))]
    pub async fn residents_of_origin(
        &self,
        origin_id: Option<u32>,
        central_id: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<CharacterRecord>, CatalogError> {
        let Some(origin_id) = origin_id else {
            debug!("Unknown origin");
            return Ok(Vec::new());
        };

        let fetched = cancellable(cancel, self.catalog.location(origin_id)).await;
        let Some(location) = not_found_as_empty(fetched.map(Some))? else {
            return Ok(Vec::new());
        };

        let residents = self.resolve_residents(&location, central_id, cancel).await?;
        let same_origin: Vec<CharacterRecord> = residents
            .into_iter()
            .filter(|r| r.origin_id() == Some(origin_id))
            .filter(|r| Some(r.id) != central_id)
            .collect();

        info!(origin_id, count = same_origin.len(), "Resolved origin residents");
        Ok(shuffle(&same_origin, seed_for(central_id)))
    }

    async fn resolve_residents(
        &self,
        location: &LocationRecord,
        exclude: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<CharacterRecord>, CatalogError> {
        let resolved = self
            .resolver
            .resolve(&location.residents, exclude, DEFAULT_MAX_ITEMS, cancel)
            .await;
        not_found_as_empty(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::{
        fixture_character, fixture_location, CatalogCall, MockCatalog, Operation,
    };

    fn earth() -> MockCatalog {
        MockCatalog::new()
            .with_characters([
                fixture_character(1, "Rick Sanchez", "Human", Some(1)),
                fixture_character(2, "Morty Smith", "Human", Some(1)),
                fixture_character(3, "Summer Smith", "Human", Some(1)),
                fixture_character(4, "Beth Smith", "Human", Some(1)),
                fixture_character(5, "Visitor", "Alien", Some(9)),
                fixture_character(6, "Drifter", "Alien", None),
            ])
            .with_location(fixture_location(1, "Earth (C-137)", &[1, 2, 3, 4, 5, 6, 2]))
    }

    #[tokio::test]
    async fn test_origin_residents_same_origin_without_central() {
        let mock = earth();
        let pipeline = LocationPipeline::new(Arc::new(mock.clone()));
        let central = fixture_character(1, "Rick Sanchez", "Human", Some(1));

        let residents = pipeline
            .origin_residents(&central, &CancellationToken::new())
            .await
            .unwrap();

        let mut ids: Vec<u32> = residents.iter().map(|r| r.id).collect();
        assert!(!ids.contains(&1));
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(!mock.batched_ids().contains(&1));
    }

    #[tokio::test]
    async fn test_origin_residents_order_is_stable_per_character() {
        let pipeline = LocationPipeline::new(Arc::new(earth()));
        let central = fixture_character(1, "Rick Sanchez", "Human", Some(1));
        let cancel = CancellationToken::new();

        let first = pipeline.origin_residents(&central, &cancel).await.unwrap();
        let second = pipeline.origin_residents(&central, &cancel).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_origin_short_circuits() {
        let mock = earth();
        let pipeline = LocationPipeline::new(Arc::new(mock.clone()));
        let central = fixture_character(6, "Drifter", "Alien", None);

        let residents = pipeline
            .origin_residents(&central, &CancellationToken::new())
            .await
            .unwrap();

        assert!(residents.is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_origin_location_is_empty() {
        let pipeline = LocationPipeline::new(Arc::new(earth()));
        let residents = pipeline
            .residents_of_origin(Some(77), Some(1), &CancellationToken::new())
            .await
            .unwrap();
        assert!(residents.is_empty());
    }

    #[tokio::test]
    async fn test_by_name_uses_first_match_only() {
        let mock =
            earth().with_location(fixture_location(2, "Earth (Replacement Dimension)", &[5]));
        let pipeline = LocationPipeline::new(Arc::new(mock.clone()));

        let residents = pipeline
            .residents_by_name("  EARTH ", &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<u32> = residents.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            mock.calls()[0],
            CatalogCall::SearchLocations("earth".into())
        );
    }

    #[tokio::test]
    async fn test_by_name_caps_residents() {
        let ids: Vec<u32> = (1..=30).collect();
        let mock = MockCatalog::new()
            .with_characters(
                ids.iter()
                    .map(|id| fixture_character(*id, "Citizen", "Human", Some(3))),
            )
            .with_location(fixture_location(3, "Citadel of Ricks", &ids));
        let pipeline = LocationPipeline::new(Arc::new(mock.clone()));

        let residents = pipeline
            .residents_by_name("citadel", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(residents.len(), 20);
        assert_eq!(mock.call_count(Operation::CharactersByIds), 1);
    }

    #[tokio::test]
    async fn test_by_name_not_found_and_failure() {
        let mock = earth();
        let pipeline = LocationPipeline::new(Arc::new(mock.clone()));
        let cancel = CancellationToken::new();

        assert!(pipeline.residents_by_name("Narnia", &cancel).await.unwrap().is_empty());
        assert!(pipeline.residents_by_name("   ", &cancel).await.unwrap().is_empty());

        mock.on(Operation::SearchLocations).return_status(500);
        let err = pipeline.residents_by_name("earth", &cancel).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
