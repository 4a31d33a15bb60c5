//! Pagination parameters and paged responses.
//!
//! The LINC API uses two conventions: most list endpoints take offset-based `skip`/`limit`,
//! the users endpoint takes 1-based `page`/`size` and wraps results in a [`PageResponse`].
//! List pages in the console fetch everything in one request and paginate client-side.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Default number of items to request when a page wants "everything".
pub const DEFAULT_FETCH_LIMIT: u32 = 1000;

/// Offset-based query parameters.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    /// First `limit` items.
    pub fn first(limit: u32) -> Self {
        Self {
            skip: Some(0),
            limit: Some(limit),
        }
    }

    /// Get the skip value, defaulting to 0 if not specified.
    #[inline]
    pub fn skip(&self) -> u32 {
        self.skip.unwrap_or(0)
    }

    /// Get the limit value, defaulting to [`DEFAULT_FETCH_LIMIT`].
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_FETCH_LIMIT).max(1)
    }
}

/// Page-based query parameters (1-based `page`).
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page.max(1)),
            size: Some(size.max(1)),
        }
    }
}

/// Paged list wrapper returned by page-based endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

impl<T> PageResponse<T> {
    /// Number of pages given `total` and `size`.
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return if self.total == 0 { 0 } else { 1 };
        }
        self.total.div_ceil(self.size as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let p = Pagination::default();
        assert_eq!(p.skip(), 0);
        assert_eq!(p.limit(), DEFAULT_FETCH_LIMIT);
    }

    #[test]
    fn test_none_fields_are_not_serialized() {
        let p = Pagination {
            skip: None,
            limit: Some(50),
        };
        assert_eq!(serde_json::to_value(p).unwrap(), serde_json::json!({"limit": 50}));
    }

    #[test]
    fn test_page_query_is_one_based() {
        let q = PageQuery::new(0, 0);
        assert_eq!(q.page, Some(1));
        assert_eq!(q.size, Some(1));
    }

    #[test]
    fn test_total_pages() {
        let page: PageResponse<u8> = serde_json::from_value(serde_json::json!({
            "items": [1, 2, 3],
            "total": 21,
            "page": 2,
            "size": 10
        }))
        .unwrap();
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }
}
