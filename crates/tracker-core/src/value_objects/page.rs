//! Page window for list queries

/// A 1-based page request, already clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp `page` to at least 1 and `page_size` to `[1, max_items]`
    pub fn new(page: i64, page_size: i64, max_items: i64) -> Self {
        let max_items = max_items.max(1);
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, max_items),
        }
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total` items
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.page_size - 1) / self.page_size
        }
    }
}
