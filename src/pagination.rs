//! Page arithmetic shared by catalog listings.

use serde::Serialize;

/// Number of catalog items returned per page when the caller does not ask
/// for a specific size.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// One page of results plus the counts a pager needs.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
        Self {
            items,
            page: page.max(1),
            pages: total.div_ceil(per_page.max(1)),
            total,
        }
    }
}
