//! Page-number pagination primitives for dashboard list endpoints.
//!
//! The dashboard API pages its list endpoints with a one-based `page` number
//! and a `size`, and wraps every page in an envelope carrying `totalPages` and
//! `totalCount`. This crate owns both halves so adapters and the query cache
//! agree on one representation:
//!
//! - [`PageRequest`] is the validated request side, hashable so it can be
//!   part of a cache key.
//! - [`Page`] is the decoded envelope, independent of the wire format.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size used when a caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size accepted by the backend.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Validation errors raised when building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers start at one.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    ZeroSize,
    /// The requested size exceeds [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {max}")]
    SizeTooLarge {
        /// Maximum accepted page size.
        max: u32,
    },
}

/// One-based page selection sent as `page` and `size` query parameters.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 25).expect("valid request");
/// assert_eq!(request.page(), 2);
/// assert_eq!(request.size(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `page` or `size` is zero, or when
    /// `size` exceeds [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if size == 0 {
            return Err(PaginationError::ZeroSize);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PaginationError::SizeTooLarge { max: MAX_PAGE_SIZE });
        }
        Ok(Self { page, size })
    }

    /// Build a request from a zero-based table page index.
    ///
    /// Table widgets count pages from zero while the API counts from one.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `size` is out of range or the index
    /// overflows.
    pub const fn from_index(page_index: u32, size: u32) -> Result<Self, PaginationError> {
        match page_index.checked_add(1) {
            Some(page) => Self::new(page, size),
            None => Err(PaginationError::ZeroPage),
        }
    }

    /// Request the first page holding up to `size` rows.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `size` is out of range.
    pub const fn first(size: u32) -> Result<Self, PaginationError> {
        Self::new(1, size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Zero-based page index for table widgets.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.page.saturating_sub(1)
    }

    /// Request for the page after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }

    /// Append `page` and `size` to the query string of `url`.
    pub fn append_to(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string());
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results together with the totals reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Number of pages available.
    pub total_pages: u32,
    /// Number of rows across all pages.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Wrap a complete, unpaged result as a single page.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::Page;
    ///
    /// let page = Page::single(vec!["a", "b"]);
    /// assert_eq!(page.total_count, 2);
    /// assert!(page.is_last());
    /// ```
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            page: 1,
            size: u32::try_from(count).unwrap_or(u32::MAX),
            total_pages: 1,
            total_count: u64::try_from(count).unwrap_or(u64::MAX),
            items,
        }
    }

    /// Slice `rows` into the page selected by `request`.
    ///
    /// In-memory adapters use this to mimic backend paging.
    #[must_use]
    pub fn slice(rows: Vec<T>, request: PageRequest) -> Self {
        let total = rows.len();
        let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let skip = usize::try_from(request.index())
            .unwrap_or(usize::MAX)
            .saturating_mul(size);
        let total_pages = total.div_ceil(size.max(1));
        Self {
            items: rows.into_iter().skip(skip).take(size).collect(),
            page: request.page(),
            size: request.size(),
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_count: u64::try_from(total).unwrap_or(u64::MAX),
        }
    }

    /// Whether no further pages follow this one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// Whether this page holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform every row while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }

    /// Fallibly transform every row, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            total_count: self.total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page requests and envelopes.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, PaginationError::ZeroPage)]
    #[case(1, 0, PaginationError::ZeroSize)]
    #[case(1, 1001, PaginationError::SizeTooLarge { max: MAX_PAGE_SIZE })]
    fn rejects_out_of_range_requests(
        #[case] page: u32,
        #[case] size: u32,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::new(page, size), Err(expected));
    }

    #[rstest]
    fn table_index_is_offset_by_one() {
        let request = PageRequest::from_index(0, 50).expect("valid index");
        assert_eq!(request.page(), 1);
        assert_eq!(request.index(), 0);
        assert_eq!(request.next().page(), 2);
    }

    #[rstest]
    fn appends_query_pairs() {
        let mut url = Url::parse("http://localhost/api/users").expect("valid url");
        PageRequest::new(3, 20).expect("valid").append_to(&mut url);
        assert_eq!(url.query(), Some("page=3&size=20"));
    }

    #[rstest]
    #[case(1, 2, vec![1, 2], 3)]
    #[case(3, 2, vec![5], 3)]
    #[case(4, 2, vec![], 3)]
    fn slices_rows_into_pages(
        #[case] page: u32,
        #[case] size: u32,
        #[case] expected: Vec<u32>,
        #[case] total_pages: u32,
    ) {
        let request = PageRequest::new(page, size).expect("valid");
        let sliced = Page::slice(vec![1, 2, 3, 4, 5], request);
        assert_eq!(sliced.items, expected);
        assert_eq!(sliced.total_pages, total_pages);
        assert_eq!(sliced.total_count, 5);
    }

    #[rstest]
    fn envelope_serialises_camel_case_totals() {
        let page = Page::single(vec!["x"]);
        let json = serde_json::to_value(&page).expect("serialise");
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalCount"], 1);
    }

    #[rstest]
    fn try_map_stops_at_first_error() {
        let page = Page::single(vec!["1", "x", "3"]);
        let mapped: Result<Page<u32>, _> = page.try_map(str::parse::<u32>);
        assert!(mapped.is_err());
    }
}
