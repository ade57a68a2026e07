//! Reference list → character records, fetched in concurrent batches.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogApi, CatalogError, OneOrMany, MAX_BATCH_SIZE};
use crate::model::{CharacterRecord, EntityReference};
use crate::runtime::cancel::{cancellable, CancellationToken};

/// Upper bound on how many referenced characters one resolution fetches.
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// Turns references into the id chunks that will be requested.
///
/// Ids are deduplicated (first occurrence wins), `exclude` is dropped, the
/// list is cut at `max_items`, then split into [`MAX_BATCH_SIZE`] chunks.
/// Malformed references contribute nothing.
pub fn plan_chunks(
    references: &[EntityReference],
    exclude: Option<u32>,
    max_items: usize,
) -> Vec<Vec<u32>> {
    let mut seen = HashSet::new();
    let ids: Vec<u32> = references
        .iter()
        .filter_map(EntityReference::id)
        .filter(|id| seen.insert(*id))
        .filter(|id| Some(*id) != exclude)
        .take(max_items)
        .collect();
    ids.chunks(MAX_BATCH_SIZE).map(<[u32]>::to_vec).collect()
}

/// Resolves reference lists through the catalog's batch endpoint.
#[derive(Clone)]
pub struct BatchResolver {
    catalog: Arc<dyn CatalogApi>,
}

impl BatchResolver {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    /// Fetches the characters behind `references`.
    ///
    /// Chunks are requested concurrently and joined all-or-fail: one failing
    /// chunk fails the whole resolution. Results are concatenated in chunk
    /// order. No references means no requests.
    pub async fn resolve(
        &self,
        references: &[EntityReference],
        exclude: Option<u32>,
        max_items: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<CharacterRecord>, CatalogError> {
        let chunks = plan_chunks(references, exclude, max_items);
        if chunks.is_empty() {
            debug!(references = references.len(), "Nothing to resolve");
            return Ok(Vec::new());
        }

        let chunk_count = chunks.len();
        debug!(chunk_count, ?exclude, "Resolving batch");

        let mut tasks = JoinSet::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            tasks.spawn(async move {
                let result = catalog.characters_by_ids(&chunk).await;
                (index, result.map(OneOrMany::into_vec))
            });
        }

        let mut batches: Vec<Vec<CharacterRecord>> = vec![Vec::new(); chunk_count];
        let joined = cancellable(cancel, async {
            while let Some(joined) = tasks.join_next().await {
                let (index, result) = joined
                    .map_err(|e| CatalogError::Transport(format!("batch task failed: {e}")))?;
                batches[index] = result?;
            }
            Ok(())
        })
        .await;

        if let Err(e) = joined {
            tasks.abort_all();
            warn!(error = %e, chunk_count, "Batch resolution failed");
            return Err(e);
        }

        let records: Vec<CharacterRecord> = batches.into_iter().flatten().collect();
        info!(chunk_count, resolved = records.len(), "Batch resolved");
        Ok(records)
    }
}
