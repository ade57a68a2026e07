use serde::Serialize;

/// Page size for client-side pagination in location mode.
pub const CLIENT_PAGE_SIZE: usize = 20;

/// One page of a listing, paged either by the catalog or locally.
///
/// `total_pages()` is never below 1, even for an empty result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "paging", rename_all = "snake_case")]
pub enum PagedResult<T> {
    /// The catalog already sliced the page.
    Server { total_pages: u32, items: Vec<T> },
    /// The full filtered set; the current page is sliced on demand.
    Client { page: u32, all: Vec<T> },
}

impl<T> PagedResult<T> {
    pub fn server(total_pages: u32, items: Vec<T>) -> Self {
        PagedResult::Server {
            total_pages: total_pages.max(1),
            items,
        }
    }

    pub fn client(all: Vec<T>, page: u32) -> Self {
        PagedResult::Client {
            page: page.max(1),
            all,
        }
    }

    pub fn empty() -> Self {
        PagedResult::server(1, Vec::new())
    }

    pub fn total_pages(&self) -> u32 {
        match self {
            PagedResult::Server { total_pages, .. } => (*total_pages).max(1),
            PagedResult::Client { all, .. } => client_total_pages(all.len()),
        }
    }

    /// Items of the current page.
    pub fn items(&self) -> &[T] {
        match self {
            PagedResult::Server { items, .. } => items,
            PagedResult::Client { page, all } => client_slice(all, *page),
        }
    }

    /// Number of matching items across all pages, when known locally.
    pub fn total_items(&self) -> Option<usize> {
        match self {
            PagedResult::Server { .. } => None,
            PagedResult::Client { all, .. } => Some(all.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PagedResult::Server { items, .. } => items.is_empty(),
            PagedResult::Client { all, .. } => all.is_empty(),
        }
    }
}

/// `ceil(count / CLIENT_PAGE_SIZE)`, at least 1.
pub fn client_total_pages(count: usize) -> u32 {
    count.div_ceil(CLIENT_PAGE_SIZE).max(1) as u32
}

/// The 1-based `page` of `all`; empty when past the end.
pub fn client_slice<T>(all: &[T], page: u32) -> &[T] {
    let start = (page.max(1) as usize - 1).saturating_mul(CLIENT_PAGE_SIZE);
    if start >= all.len() {
        return &[];
    }
    let end = (start + CLIENT_PAGE_SIZE).min(all.len());
    &all[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_paging_over_45_items() {
        let all: Vec<u32> = (0..45).collect();

        let first = PagedResult::client(all.clone(), 1);
        assert_eq!(first.total_pages(), 3);
        assert_eq!(first.items(), &all[0..20]);

        let last = PagedResult::client(all.clone(), 3);
        assert_eq!(last.items(), &all[40..45]);

        let past = PagedResult::client(all, 4);
        assert!(past.items().is_empty());
    }

    #[test]
    fn test_total_pages_is_at_least_one() {
        assert_eq!(PagedResult::<u32>::client(Vec::new(), 1).total_pages(), 1);
        assert_eq!(PagedResult::<u32>::server(0, Vec::new()).total_pages(), 1);
        assert_eq!(PagedResult::<u32>::empty().total_pages(), 1);
        assert_eq!(client_total_pages(20), 1);
        assert_eq!(client_total_pages(21), 2);
    }
}
