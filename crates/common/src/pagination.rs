//! Pagination envelopes and slicing.
//!
//! All listings in newsroom return a [`Page`] envelope: the requested slice
//! plus the totals computed over the full filtered set.

use serde::Serialize;

/// A 1-based page request.
///
/// `current_page` and `items_per_page` are clamped to a minimum of 1 at
/// construction; beyond that, caller-supplied values flow through untouched.
/// A page past the end yields an empty slice with the totals still covering
/// the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    current_page: u64,
    items_per_page: u64,
}

impl PageRequest {
    /// Create a page request, clamping both values to at least 1.
    #[must_use]
    pub fn new(current_page: i64, items_per_page: i64) -> Self {
        Self {
            current_page: current_page.max(1) as u64,
            items_per_page: items_per_page.max(1) as u64,
        }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Items per page.
    #[must_use]
    pub const fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.current_page - 1) * self.items_per_page
    }

    /// Number of items to take.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.items_per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// A page of results with pagination totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The 1-based page number that was requested.
    pub current_page: u64,
    /// Items per page that was requested.
    pub items_per_page: u64,
    /// Count of the full filtered set, before slicing.
    pub total_items: u64,
    /// Total page count. See [`total_pages`] for the exact formula.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page envelope from an already-sliced item list and the
    /// pre-pagination total.
    #[must_use]
    pub fn assemble(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            current_page: request.current_page(),
            items_per_page: request.items_per_page(),
            total_items,
            total_pages: total_pages(total_items, request.items_per_page()),
        }
    }

    /// An empty page carrying zero totals.
    #[must_use]
    pub fn empty(request: &PageRequest) -> Self {
        Self::assemble(Vec::new(), request, 0)
    }
}

/// Total page count for a result set.
///
/// Zero when the set is empty, else `total_items / items_per_page + 1`.
/// The formula over-counts by one whenever `total_items` is an exact
/// multiple of `items_per_page`; existing clients depend on the reported
/// counts, so it is kept as-is.
#[must_use]
pub const fn total_pages(total_items: u64, items_per_page: u64) -> u64 {
    if total_items == 0 {
        0
    } else {
        total_items / items_per_page + 1
    }
}

/// Slice an in-memory ordered set into a page envelope.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let total_items = items.len() as u64;
    let sliced: Vec<T> = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();

    Page::assemble(sliced, request, total_items)
}
