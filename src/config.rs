//! Table configuration.

use crate::access::row::ROWS_PER_PAGE;
use crate::storage::page::TABLE_MAX_PAGES;

/// Limits applied when opening a [`Table`](crate::access::Table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Hard limit on addressable pages; bounds the table at
    /// `max_pages * ROWS_PER_PAGE` rows.
    pub max_pages: usize,

    /// Pages kept in memory at once. Below `max_pages` the least recently
    /// used page is written out and dropped to make room.
    pub cache_pages: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_pages: TABLE_MAX_PAGES,
            cache_pages: TABLE_MAX_PAGES,
        }
    }
}

impl TableConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self.cache_pages = self.cache_pages.min(self.max_pages);
        self
    }

    pub fn with_cache_pages(mut self, cache_pages: usize) -> Self {
        self.cache_pages = cache_pages.clamp(1, self.max_pages);
        self
    }

    pub fn max_rows(&self) -> usize {
        self.max_pages * ROWS_PER_PAGE
    }
}
