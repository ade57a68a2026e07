//! # Mock Catalog
//!
//! An in-memory [`CatalogApi`] for exercising the pipelines without a network.
//!
//! The mock serves fixture records with the same response shapes as the real
//! catalog (a bare object for single-id batches, 404 for empty searches),
//! records every call, and can be scripted to fail specific operations.
//!
//! ```ignore
//! let mock = MockCatalog::new()
//!     .with_character(fixture_character(1, "Rick Sanchez", "Human", Some(1)))
//!     .with_location(fixture_location(1, "Earth (C-137)", &[1]));
//! mock.on(Operation::CharactersByIds).return_err(CatalogError::Timeout);
//!
//! let catalog: Arc<dyn CatalogApi> = Arc::new(mock.clone());
//! // Drive a pipeline with `catalog`...
//! mock.verify(); // Ensures all scripted failures were consumed
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::api::{CatalogApi, OneOrMany};
use super::error::CatalogError;
use super::query::{non_blank, CharacterQuery};
use crate::model::{
    CharacterPage, CharacterRecord, EntityReference, Gender, LifeStatus, LocationRecord,
    NamedReference, PageInfo,
};

pub const MOCK_BASE_URL: &str = "https://catalog.test/api";

const MOCK_PAGE_SIZE: usize = 20;

/// The catalog operations, used to target scripted failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Character,
    CharactersByIds,
    CharactersPage,
    Location,
    SearchLocations,
}

/// A call as received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Character(u32),
    CharactersByIds(Vec<u32>),
    CharactersPage(CharacterQuery),
    Location(u32),
    SearchLocations(String),
}

impl CatalogCall {
    pub fn operation(&self) -> Operation {
        match self {
            CatalogCall::Character(_) => Operation::Character,
            CatalogCall::CharactersByIds(_) => Operation::CharactersByIds,
            CatalogCall::CharactersPage(_) => Operation::CharactersPage,
            CatalogCall::Location(_) => Operation::Location,
            CatalogCall::SearchLocations(_) => Operation::SearchLocations,
        }
    }
}

struct ScriptedFailure {
    operation: Operation,
    error: CatalogError,
}

/// Fixture-backed catalog. Clones share the call log and failure script.
#[derive(Clone, Default)]
pub struct MockCatalog {
    characters: BTreeMap<u32, CharacterRecord>,
    locations: BTreeMap<u32, LocationRecord>,
    failures: Arc<Mutex<VecDeque<ScriptedFailure>>>,
    calls: Arc<Mutex<Vec<CatalogCall>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, record: CharacterRecord) -> Self {
        self.characters.insert(record.id, record);
        self
    }

    pub fn with_characters(self, records: impl IntoIterator<Item = CharacterRecord>) -> Self {
        records.into_iter().fold(self, Self::with_character)
    }

    pub fn with_location(mut self, location: LocationRecord) -> Self {
        self.locations.insert(location.id, location);
        self
    }

    /// Scripts the next call of `operation` to fail.
    pub fn on(&self, operation: Operation) -> FailureBuilder {
        FailureBuilder {
            operation,
            failures: self.failures.clone(),
        }
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// All ids requested through batch fetches, across every chunk.
    pub fn batched_ids(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CatalogCall::CharactersByIds(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Verifies that all scripted failures were consumed.
    pub fn verify(&self) {
        let failures = self.failures.lock().unwrap();
        if !failures.is_empty() {
            panic!(
                "Not all scripted failures were triggered. {} remaining",
                failures.len()
            );
        }
    }

    fn record(&self, call: CatalogCall) -> Result<(), CatalogError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);

        let mut failures = self.failures.lock().unwrap();
        let scripted = failures
            .iter()
            .position(|f| f.operation == operation)
            .and_then(|index| failures.remove(index));
        match scripted {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

/// Builder for a scripted failure.
pub struct FailureBuilder {
    operation: Operation,
    failures: Arc<Mutex<VecDeque<ScriptedFailure>>>,
}

impl FailureBuilder {
    pub fn return_err(self, error: CatalogError) {
        self.failures.lock().unwrap().push_back(ScriptedFailure {
            operation: self.operation,
            error,
        });
    }

    /// Shorthand for a non-404 HTTP failure.
    pub fn return_status(self, status: u16) {
        let error = if status == 404 {
            CatalogError::not_found("scripted")
        } else {
            CatalogError::Http {
                status,
                body: "scripted failure".to_string(),
            }
        };
        self.return_err(error);
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn character(&self, id: u32) -> Result<CharacterRecord, CatalogError> {
        self.record(CatalogCall::Character(id))?;
        self.characters
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("character/{id}")))
    }

    async fn characters_by_ids(
        &self,
        ids: &[u32],
    ) -> Result<OneOrMany<CharacterRecord>, CatalogError> {
        if ids.is_empty() {
            return Ok(OneOrMany::default());
        }
        self.record(CatalogCall::CharactersByIds(ids.to_vec()))?;
        if let [id] = ids {
            return self
                .characters
                .get(id)
                .cloned()
                .map(OneOrMany::One)
                .ok_or_else(|| CatalogError::not_found(format!("character/{id}")));
        }
        Ok(OneOrMany::Many(
            ids.iter()
                .filter_map(|id| self.characters.get(id).cloned())
                .collect(),
        ))
    }

    async fn characters_page(&self, query: &CharacterQuery) -> Result<CharacterPage, CatalogError> {
        self.record(CatalogCall::CharactersPage(query.clone()))?;
        let name = non_blank(&query.name);
        let species = non_blank(&query.species);
        let matching: Vec<_> = self
            .characters
            .values()
            .filter(|c| name.map_or(true, |n| contains_ignore_case(&c.name, n)))
            .filter(|c| species.map_or(true, |s| contains_ignore_case(&c.species, s)))
            .cloned()
            .collect();

        let pages = matching.len().div_ceil(MOCK_PAGE_SIZE);
        let page = query.page.max(1) as usize;
        if matching.is_empty() || page > pages {
            return Err(CatalogError::not_found("character"));
        }
        let results = matching
            .iter()
            .skip((page - 1) * MOCK_PAGE_SIZE)
            .take(MOCK_PAGE_SIZE)
            .cloned()
            .collect();
        Ok(CharacterPage {
            info: PageInfo {
                count: matching.len() as u32,
                pages: pages as u32,
                next: None,
                prev: None,
            },
            results,
        })
    }

    async fn location(&self, id: u32) -> Result<LocationRecord, CatalogError> {
        self.record(CatalogCall::Location(id))?;
        self.locations
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("location/{id}")))
    }

    async fn search_locations(&self, name: &str) -> Result<Vec<LocationRecord>, CatalogError> {
        self.record(CatalogCall::SearchLocations(name.to_string()))?;
        let needle = name.trim();
        let found: Vec<_> = self
            .locations
            .values()
            .filter(|l| contains_ignore_case(&l.name, needle))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(CatalogError::not_found("location"));
        }
        Ok(found)
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn character_ref(id: u32) -> EntityReference {
    EntityReference::new(format!("{MOCK_BASE_URL}/character/{id}"))
}

pub fn location_ref(id: u32) -> EntityReference {
    EntityReference::new(format!("{MOCK_BASE_URL}/location/{id}"))
}

/// A living character; `origin: None` models the catalog's "unknown" origin.
pub fn fixture_character(
    id: u32,
    name: &str,
    species: &str,
    origin: Option<u32>,
) -> CharacterRecord {
    let origin = match origin {
        Some(location_id) => {
            NamedReference::new(format!("Location {location_id}"), location_ref(location_id))
        }
        None => NamedReference::new("unknown", ""),
    };
    CharacterRecord {
        id,
        name: name.to_string(),
        status: LifeStatus::Alive,
        species: species.to_string(),
        kind: String::new(),
        gender: Gender::Unknown,
        image: format!("{MOCK_BASE_URL}/character/avatar/{id}.jpeg"),
        location: origin.clone(),
        origin,
    }
}

pub fn fixture_location(id: u32, name: &str, residents: &[u32]) -> LocationRecord {
    LocationRecord {
        id,
        name: name.to_string(),
        kind: "Planet".to_string(),
        dimension: "unknown".to_string(),
        residents: residents.iter().copied().map(character_ref).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_id_batch_returns_bare_record() {
        let mock = MockCatalog::new()
            .with_character(fixture_character(1, "Rick", "Human", Some(1)))
            .with_character(fixture_character(2, "Morty", "Human", Some(1)));

        let one = mock.characters_by_ids(&[1]).await.unwrap();
        assert!(matches!(one, OneOrMany::One(ref r) if r.id == 1));

        let many = mock.characters_by_ids(&[1, 2]).await.unwrap();
        assert!(matches!(many, OneOrMany::Many(ref rs) if rs.len() == 2));
    }

    #[tokio::test]
    async fn test_scripted_failure_is_consumed_once() {
        let mock = MockCatalog::new().with_location(fixture_location(3, "Citadel of Ricks", &[]));
        mock.on(Operation::Location).return_status(500);

        let first = mock.location(3).await;
        assert_eq!(first.unwrap_err().status(), Some(500));
        assert!(mock.location(3).await.is_ok());
        assert_eq!(mock.call_count(Operation::Location), 2);
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_search_is_not_found() {
        let mock = MockCatalog::new();
        let err = mock.search_locations("nowhere").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
