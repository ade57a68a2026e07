use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::query::CharacterQuery;
use crate::model::{CharacterPage, CharacterRecord, LocationRecord};

/// Largest number of ids the catalog accepts in one batch request.
pub const MAX_BATCH_SIZE: usize = 20;

/// A batch response: the catalog answers a single-id batch with a bare object
/// and anything larger with an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Port to the character catalog.
///
/// Implementations own the transport; callers only see records and
/// [`CatalogError`]s.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one character. Unknown ids fail with [`CatalogError::NotFound`].
    async fn character(&self, id: u32) -> Result<CharacterRecord, CatalogError>;

    /// Fetch up to [`MAX_BATCH_SIZE`] characters in one round trip.
    ///
    /// An empty id list yields an empty sequence without touching the network.
    async fn characters_by_ids(
        &self,
        ids: &[u32],
    ) -> Result<OneOrMany<CharacterRecord>, CatalogError>;

    /// Fetch one server-side page, filtered by name and species.
    /// No match fails with [`CatalogError::NotFound`].
    async fn characters_page(&self, query: &CharacterQuery) -> Result<CharacterPage, CatalogError>;

    async fn location(&self, id: u32) -> Result<LocationRecord, CatalogError>;

    /// Locations whose name contains `name`. No match fails with
    /// [`CatalogError::NotFound`].
    async fn search_locations(&self, name: &str) -> Result<Vec<LocationRecord>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_batch_shapes() {
        let many: OneOrMany<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(many.into_vec(), vec![1, 2]);

        let one: OneOrMany<u32> = serde_json::from_str("7").unwrap();
        assert_eq!(one.into_vec(), vec![7]);
    }
}
