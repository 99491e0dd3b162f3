use super::replacer::Replacer;
use crate::storage::page::PageId;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct LruReplacer {
    /// Resident pages, least recently used at front
    lru_list: VecDeque<PageId>,
}

impl LruReplacer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lru_list: VecDeque::with_capacity(capacity),
        }
    }

    fn position(&self, page_id: PageId) -> Option<usize> {
        self.lru_list.iter().position(|&p| p == page_id)
    }
}

impl Replacer for LruReplacer {
    fn evict(&mut self) -> Option<PageId> {
        self.lru_list.pop_front()
    }

    fn record_access(&mut self, page_id: PageId) {
        // Already most recent: the common case during a scan or an append run
        if self.lru_list.back() == Some(&page_id) {
            return;
        }
        if let Some(idx) = self.position(page_id) {
            self.lru_list.remove(idx);
        }
        self.lru_list.push_back(page_id);
    }

    fn remove(&mut self, page_id: PageId) {
        if let Some(idx) = self.position(page_id) {
            self.lru_list.remove(idx);
        }
    }

    fn size(&self) -> usize {
        self.lru_list.len()
    }
}
