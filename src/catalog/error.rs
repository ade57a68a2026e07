//! Error types for the catalog transport.

use thiserror::Error;

/// Errors surfaced by a [`CatalogApi`](super::CatalogApi) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog answered 404: unknown id or a search with no match.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request timed out")]
    Timeout,
}

impl CatalogError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        CatalogError::NotFound {
            resource: resource.into(),
        }
    }

    /// True for the 404 class, which callers fold into an empty result.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// Status code carried by the error, if it came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::NotFound { .. } => Some(404),
            CatalogError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}

/// Folds the 404 class into `T::default()`; every other error passes through.
pub fn not_found_as_empty<T: Default>(result: Result<T, CatalogError>) -> Result<T, CatalogError> {
    match result {
        Err(e) if e.is_not_found() => Ok(T::default()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_folds_to_empty() {
        let folded: Result<Vec<u32>, _> = not_found_as_empty(Err(CatalogError::not_found("x")));
        assert_eq!(folded, Ok(vec![]));

        let kept: Result<Vec<u32>, _> = not_found_as_empty(Err(CatalogError::Http {
            status: 500,
            body: String::new(),
        }));
        assert_eq!(kept.unwrap_err().status(), Some(500));
    }
}
