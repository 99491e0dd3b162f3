pub mod lru;
pub mod replacer;

use crate::config::TableConfig;
use crate::storage::disk::PageManager;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::{PageId, PAGE_SIZE};
use log::debug;
use lru::LruReplacer;
use replacer::Replacer;
use std::collections::HashMap;
use std::path::Path;

struct Frame {
    data: Box<[u8; PAGE_SIZE]>,
    /// Leading bytes modified since the page was last written out
    dirty_len: usize,
}

impl Frame {
    fn new() -> Self {
        Self {
            data: Box::new([0u8; PAGE_SIZE]),
            dirty_len: 0,
        }
    }
}

/// Page cache over a single backing file.
///
/// Pages are loaded lazily on first access and stay resident until they are
/// released, or until the cache is at `cache_pages` and the replacer picks
/// them for eviction. Nothing is written back unless asked for, apart from
/// dirty pages that get evicted.
pub struct Pager {
    page_manager: PageManager,
    frames: HashMap<PageId, Frame>,
    replacer: Box<dyn Replacer>,
    max_pages: usize,
    cache_pages: usize,
}

impl Pager {
    pub fn open(path: &Path, config: &TableConfig) -> StorageResult<Self> {
        let page_manager = PageManager::open(path)?;
        let replacer = Box::new(LruReplacer::new(config.cache_pages));
        Ok(Self::new(
            page_manager,
            replacer,
            config.max_pages,
            config.cache_pages,
        ))
    }

    pub fn new(
        page_manager: PageManager,
        replacer: Box<dyn Replacer>,
        max_pages: usize,
        cache_pages: usize,
    ) -> Self {
        Self {
            page_manager,
            frames: HashMap::with_capacity(cache_pages),
            replacer,
            max_pages,
            cache_pages: cache_pages.max(1),
        }
    }

    /// Length of the backing file as last seen by this pager.
    pub fn file_length(&self) -> u64 {
        self.page_manager.file_length()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn resident_pages(&self) -> usize {
        self.frames.len()
    }

    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.frames.contains_key(&page_id)
    }

    /// Returns the buffer for `page_id`, loading it from disk on a cache miss.
    ///
    /// A page beyond the end of the file comes back zeroed; the final on-disk
    /// page may be partly file content and partly zeroes.
    pub fn get_page(&mut self, page_id: PageId) -> StorageResult<&mut [u8; PAGE_SIZE]> {
        if page_id.0 as usize >= self.max_pages {
            return Err(StorageError::PageOutOfBounds {
                page_id,
                max_pages: self.max_pages,
            });
        }

        if !self.frames.contains_key(&page_id) {
            if self.frames.len() >= self.cache_pages {
                self.evict()?;
            }

            let mut frame = Frame::new();
            let bytes_read = self.page_manager.read_page(page_id, &mut frame.data)?;
            debug!("loaded page {} ({} bytes from disk)", page_id, bytes_read);
            self.frames.insert(page_id, frame);
        }

        self.replacer.record_access(page_id);
        debug_assert_eq!(self.replacer.size(), self.frames.len());
        let frame = self
            .frames
            .get_mut(&page_id)
            .ok_or(StorageError::PageNotResident(page_id))?;
        Ok(&mut *frame.data)
    }

    /// Notes that the first `used_bytes` bytes of a resident page changed.
    pub fn mark_dirty(&mut self, page_id: PageId, used_bytes: usize) {
        if let Some(frame) = self.frames.get_mut(&page_id) {
            frame.dirty_len = frame.dirty_len.max(used_bytes.min(PAGE_SIZE));
        }
    }

    /// Writes the first `byte_count` bytes of a resident page back to disk.
    pub fn flush(&mut self, page_id: PageId, byte_count: usize) -> StorageResult<()> {
        let frame = self
            .frames
            .get_mut(&page_id)
            .ok_or(StorageError::PageNotResident(page_id))?;

        let byte_count = byte_count.min(PAGE_SIZE);
        self.page_manager
            .write_page(page_id, &frame.data[..byte_count])?;
        if byte_count >= frame.dirty_len {
            frame.dirty_len = 0;
        }

        debug!("flushed page {} ({} bytes)", page_id, byte_count);
        Ok(())
    }

    /// Drops a resident page without writing it.
    pub fn release(&mut self, page_id: PageId) {
        if self.frames.remove(&page_id).is_some() {
            self.replacer.remove(page_id);
        }
    }

    /// Releases the file handle. Pages still resident are discarded unwritten.
    pub fn close(mut self) -> StorageResult<()> {
        if !self.frames.is_empty() {
            debug!("discarding {} unflushed pages", self.frames.len());
            self.frames.clear();
        }
        self.page_manager.close()
    }

    /// Writes back and drops the replacer's victim. On a failed write the
    /// victim stays resident and is handed back to the replacer.
    fn evict(&mut self) -> StorageResult<()> {
        let Some(victim) = self.replacer.evict() else {
            return Ok(());
        };

        let Some(frame) = self.frames.get(&victim) else {
            return Ok(());
        };
        let dirty_len = frame.dirty_len;
        if dirty_len > 0 {
            if let Err(e) = self.page_manager.write_page(victim, &frame.data[..dirty_len]) {
                self.replacer.record_access(victim);
                return Err(e);
            }
        }

        self.frames.remove(&victim);
        debug!("evicted page {} ({} dirty bytes written)", victim, dirty_len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn create_test_pager(dir: &Path, max_pages: usize, cache_pages: usize) -> Result<Pager> {
        let page_manager = PageManager::open(&dir.join("test.db"))?;
        let replacer = Box::new(LruReplacer::new(cache_pages));
        Ok(Pager::new(page_manager, replacer, max_pages, cache_pages))
    }

    #[test]
    fn test_new_page_is_zeroed() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 10)?;

        let page = pager.get_page(PageId(3))?;
        assert!(page.iter().all(|&b| b == 0));
        assert!(pager.is_resident(PageId(3)));
        assert_eq!(pager.resident_pages(), 1);

        Ok(())
    }

    #[test]
    fn test_get_page_is_cached() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 10)?;

        pager.get_page(PageId(0))?[0] = 42;
        assert_eq!(pager.get_page(PageId(0))?[0], 42);
        assert_eq!(pager.resident_pages(), 1);

        Ok(())
    }

    #[test]
    fn test_out_of_bounds() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 10)?;

        assert!(pager.get_page(PageId(9)).is_ok());
        let err = pager.get_page(PageId(10)).unwrap_err();
        assert!(matches!(
            err,
            StorageError::PageOutOfBounds { page_id: PageId(10), max_pages: 10 }
        ));

        Ok(())
    }

    #[test]
    fn test_flush_not_resident() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 10)?;

        let err = pager.flush(PageId(0), PAGE_SIZE).unwrap_err();
        assert!(matches!(err, StorageError::PageNotResident(PageId(0))));

        Ok(())
    }

    #[test]
    fn test_partial_flush_and_reload() -> Result<()> {
        let dir = tempdir()?;

        {
            let mut pager = create_test_pager(dir.path(), 10, 10)?;
            pager.get_page(PageId(0))?.fill(1);
            pager.get_page(PageId(1))?.fill(2);
            pager.flush(PageId(0), PAGE_SIZE)?;
            pager.flush(PageId(1), 10)?;
            assert_eq!(pager.file_length(), PAGE_SIZE as u64 + 10);
            pager.close()?;
        }

        let mut pager = create_test_pager(dir.path(), 10, 10)?;
        assert_eq!(pager.file_length(), PAGE_SIZE as u64 + 10);
        assert!(pager.get_page(PageId(0))?.iter().all(|&b| b == 1));

        let page = pager.get_page(PageId(1))?;
        assert!(page[..10].iter().all(|&b| b == 2));
        assert!(page[10..].iter().all(|&b| b == 0));

        Ok(())
    }

    #[test]
    fn test_release_discards_changes() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 10)?;

        pager.get_page(PageId(0))?[0] = 5;
        pager.release(PageId(0));
        assert!(!pager.is_resident(PageId(0)));
        assert_eq!(pager.get_page(PageId(0))?[0], 0);

        Ok(())
    }

    #[test]
    fn test_eviction_writes_dirty_bytes() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 2)?;

        pager.get_page(PageId(0))?.fill(1);
        pager.mark_dirty(PageId(0), 100);
        pager.get_page(PageId(1))?.fill(2);

        // Loading a third page pushes out page 0, the least recently used
        pager.get_page(PageId(2))?;
        assert_eq!(pager.resident_pages(), 2);
        assert!(!pager.is_resident(PageId(0)));
        assert_eq!(pager.file_length(), 100);

        // Only the dirty prefix made it to disk
        let page = pager.get_page(PageId(0))?;
        assert!(page[..100].iter().all(|&b| b == 1));
        assert!(page[100..].iter().all(|&b| b == 0));

        Ok(())
    }

    #[test]
    fn test_eviction_skips_clean_pages() -> Result<()> {
        let dir = tempdir()?;
        let mut pager = create_test_pager(dir.path(), 10, 1)?;

        pager.get_page(PageId(0))?.fill(9);
        pager.get_page(PageId(1))?;
        assert_eq!(pager.file_length(), 0);

        Ok(())
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_failed_eviction_keeps_page() -> Result<()> {
        // Every write to /dev/full fails with ENOSPC
        let page_manager = PageManager::open(Path::new("/dev/full"))?;
        let replacer = Box::new(LruReplacer::new(1));
        let mut pager = Pager::new(page_manager, replacer, 10, 1);

        pager.get_page(PageId(0))?.fill(3);
        pager.mark_dirty(PageId(0), 100);

        assert!(pager.get_page(PageId(1)).is_err());
        assert_eq!(pager.resident_pages(), 1);
        assert!(pager.is_resident(PageId(0)));
        assert!(!pager.is_resident(PageId(1)));
        assert!(pager.get_page(PageId(0))?.iter().all(|&b| b == 3));

        Ok(())
    }

    #[test]
    fn test_open_with_config() -> Result<()> {
        let dir = tempdir()?;
        let config = TableConfig::default().with_max_pages(3);
        let mut pager = Pager::open(&dir.path().join("test.db"), &config)?;

        assert_eq!(pager.max_pages(), 3);
        assert!(pager.get_page(PageId(3)).is_err());
        pager.close()?;

        Ok(())
    }
}
