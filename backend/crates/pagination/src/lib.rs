//! Page-number pagination primitives shared by list endpoints.
//!
//! Clients send `page` and `limit` as raw query-string values. This crate
//! parses and bounds them into a [`PageRequest`], and wraps result sets in a
//! [`Page`] envelope carrying the totals clients need to render pagers.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::parse(Some("2"), Some("25")).expect("valid page");
//! assert_eq!(request.offset(), 25);
//!
//! let page = Page::new(vec!["a", "b"], request, 27);
//! assert_eq!(page.pagination().total_pages(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Reasons a page request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was not a positive integer.
    #[error("page must be a positive integer, got {value:?}")]
    InvalidPage {
        /// Raw value supplied by the client.
        value: String,
    },
    /// `limit` was not a positive integer.
    #[error("limit must be a positive integer, got {value:?}")]
    InvalidLimit {
        /// Raw value supplied by the client.
        value: String,
    },
    /// `limit` exceeded [`MAX_LIMIT`].
    #[error("limit must not exceed {max}")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: u32,
    },
}

impl PageRequestError {
    /// Name of the query parameter that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidPage { .. } => "page",
            Self::InvalidLimit { .. } | Self::LimitTooLarge { .. } => "limit",
        }
    }
}

/// Validated page coordinates.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from already-typed values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero or the limit
    /// exceeds [`MAX_LIMIT`].
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage {
                value: page.to_string(),
            });
        }
        if limit == 0 {
            return Err(PageRequestError::InvalidLimit {
                value: limit.to_string(),
            });
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Parse raw query-string values, applying defaults for missing ones.
    ///
    /// Surrounding whitespace is ignored; an empty value counts as missing.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a value is not a positive integer or
    /// the limit exceeds [`MAX_LIMIT`].
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PageRequestError> {
        let page = parse_positive(page, DEFAULT_PAGE).map_err(|value| {
            PageRequestError::InvalidPage { value }
        })?;
        let limit = parse_positive(limit, DEFAULT_LIMIT).map_err(|value| {
            PageRequestError::InvalidLimit { value }
        })?;
        Self::new(page, limit)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> Result<u32, String> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default);
    };
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(value.to_owned()),
    }
}

/// Pagination metadata returned next to a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
}

impl PageMeta {
    /// Compute metadata for `total` items split by `request`.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size that produced this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to show every item.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }
}

/// A page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    pagination: PageMeta,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request` out of `total` matches.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: PageMeta::new(request, total),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Pagination metadata.
    #[must_use]
    pub const fn pagination(&self) -> &PageMeta {
        &self.pagination
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item, keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page parsing and metadata.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some("3"), None, 3, 10)]
    #[case(None, Some("100"), 1, 100)]
    #[case(Some(" 2 "), Some(""), 2, 10)]
    fn parse_applies_defaults(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::parse(page, limit).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(Some("0"), None, "page")]
    #[case(Some("-1"), None, "page")]
    #[case(Some("abc"), None, "page")]
    #[case(None, Some("0"), "limit")]
    #[case(None, Some("1.5"), "limit")]
    #[case(None, Some("101"), "limit")]
    fn parse_rejects_out_of_range_values(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
    ) {
        let err = PageRequest::parse(page, limit).expect_err("invalid request");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(4, 25, 75)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] expected: u64) {
        let meta = PageMeta::new(PageRequest::default(), total);
        assert_eq!(meta.total_pages(), expected);
    }

    #[test]
    fn page_serialises_camel_case_envelope() {
        let page = Page::new(vec![1, 2], PageRequest::default(), 2);
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(
            value,
            serde_json::json!({
                "items": [1, 2],
                "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}
            })
        );
    }

    #[test]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::default(), 12).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.pagination().total(), 12);
    }
}
