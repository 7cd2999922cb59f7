//! Page-number pagination shared by the listing, enquiry and admin views.

use serde::Serialize;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 50;

/// Largest row offset the database accepts (a signed 64-bit `OFFSET`).
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Effective page parameters after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Clamp raw input: page size to `1..=MAX_PAGE_SIZE`, page to at least 1
    /// and low enough that its offset fits the database.
    #[must_use]
    pub fn new(page: Option<u64>, page_size: Option<u64>, default_page_size: u64) -> Self {
        let page_size = page_size
            .unwrap_or(default_page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let last_page = MAX_OFFSET / page_size + 1;

        Self {
            page: page.unwrap_or(1).clamp(1, last_page),
            page_size,
        }
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total` items; never less than one.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        let pages = total.div_ceil(self.page_size);
        if pages == 0 { 1 } else { pages }
    }

    /// Wrap one page of items with its totals.
    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages(total),
        }
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Map the items, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}
