//! Client-side pagination over fetched lists

use serde::Serialize;

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).max(1),
        }
    }

    /// Slice `items` to the requested page. Pages past the end are empty.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let per_page = self.per_page as usize;
        let start = (self.page as usize - 1).saturating_mul(per_page);

        let items = items.into_iter().skip(start).take(per_page).collect();

        Page {
            items,
            total,
            page: self.page,
            per_page: self.per_page,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// One page of a filtered list
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: usize,
}
