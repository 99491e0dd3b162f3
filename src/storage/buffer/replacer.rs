use crate::storage::page::PageId;
use std::fmt::Debug;

pub trait Replacer: Debug {
    /// Select a page to evict. Returns None if no page is tracked.
    fn evict(&mut self) -> Option<PageId>;

    /// Record that a page was just used, making it the last eviction candidate.
    fn record_access(&mut self, page_id: PageId);

    /// Stop tracking a page that left the cache by other means.
    fn remove(&mut self, page_id: PageId);

    /// Get the number of tracked pages.
    fn size(&self) -> usize;
}
