//! Offset pagination helpers.

use folio_api_types::PagedResponse;

/// Fixed number of posts per listing page.
pub const POSTS_PAGE_SIZE: u32 = 10;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Request for the given page of a post listing.
    pub fn posts(page: u32) -> Self {
        Self::new(page, POSTS_PAGE_SIZE)
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// Number of pages needed to hold `total_count` rows.
pub fn total_pages(total_count: u64, size: u32) -> u64 {
    total_count.div_ceil(u64::from(size.max(1)))
}

/// One page of items together with the totals of the filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            current_page: request.page,
            total_count,
            total_pages: total_pages(total_count, request.size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

impl<T> From<Page<T>> for PagedResponse<T> {
    fn from(page: Page<T>) -> Self {
        PagedResponse {
            current_page: page.current_page,
            total_count: page.total_count,
            total_page: page.total_pages,
            data: page.items,
        }
    }
}
