use serde::Serialize;
use tracing::instrument;

use super::location::LocationPipeline;
use crate::catalog::CatalogError;
use crate::model::CharacterRecord;
use crate::runtime::cancel::{cancellable, CancellationToken};

/// Everything the detail view shows for one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDetail {
    pub character: CharacterRecord,
    pub origin_id: Option<u32>,
    /// Other residents of the same origin, in seeded order.
    pub neighbors: Vec<CharacterRecord>,
}

impl LocationPipeline {
    /// Loads a character and its same-origin neighbors.
    ///
    /// Unlike the listing paths, a missing character is an error: the detail
    /// view has nothing to show without it.
    #[instrument(skip(self, cancel))]
    pub async fn character_detail(
        &self,
        id: u32,
        cancel: &CancellationToken,
    ) -> Result<CharacterDetail, CatalogError> {
        let character = cancellable(cancel, self.catalog().character(id)).await?;
        let neighbors = self.origin_residents(&character, cancel).await?;
        Ok(CharacterDetail {
            origin_id: character.origin_id(),
            character,
            neighbors,
        })
    }
}
