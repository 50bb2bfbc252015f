use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&page_size=` query parameters. Pages are 1-based.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageParams {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page(&self) -> AppResult<u64> {
        match self.page {
            None => Ok(1),
            Some(0) => Err(AppError::NotFound("Invalid page.".to_string())),
            Some(page) => Ok(page),
        }
    }
}

/// Page envelope returned by paginated listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: u64, page: u64, page_size: u64) -> Self {
        let pages = count.div_ceil(page_size);
        Self {
            count,
            next: (page < pages).then_some(page + 1),
            previous: (page > 1).then(|| page - 1),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 10)]
    #[case(Some(0), 1)]
    #[case(Some(25), 25)]
    #[case(Some(500), 100)]
    fn page_size_is_clamped(#[case] requested: Option<u64>, #[case] expected: u64) {
        let params = PageParams {
            page: None,
            page_size: requested,
        };
        assert_eq!(params.page_size(), expected);
    }

    #[rstest]
    fn page_zero_is_invalid() {
        let params = PageParams {
            page: Some(0),
            page_size: None,
        };
        assert!(matches!(params.page(), Err(AppError::NotFound(_))));
    }

    #[rstest]
    fn envelope_links_neighbouring_pages() {
        let page = Page::new(vec![1, 2, 3], 23, 2, 10);
        assert_eq!(page.next, Some(3));
        assert_eq!(page.previous, Some(1));

        let last = Page::new(vec![1, 2, 3], 23, 3, 10);
        assert_eq!(last.next, None);

        let only = Page::<i32>::new(vec![], 0, 1, 10);
        assert_eq!(only.next, None);
        assert_eq!(only.previous, None);
    }
}
