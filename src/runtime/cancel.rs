//! Cancellation for in-flight catalog work.

use std::future::Future;

pub use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogError;

/// Runs `fut` unless `token` fires first, in which case the future is dropped
/// and [`CatalogError::Cancelled`] is returned.
pub async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CatalogError::Cancelled),
        result = fut => result,
    }
}
