use crate::storage::error::StorageResult;
use crate::storage::page::{PageId, PAGE_SIZE};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Raw page-granular access to the backing file.
///
/// The file is a flat byte array; a page is just the window
/// `[page * PAGE_SIZE, (page + 1) * PAGE_SIZE)`. The last page on disk may be
/// shorter than `PAGE_SIZE`.
pub struct PageManager {
    file: File,
    file_length: u64,
}

impl PageManager {
    /// Opens the file for read/write, creating it if it does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_length = file.seek(SeekFrom::End(0))?;
        debug!("opened {:?} ({} bytes)", path, file_length);

        Ok(Self { file, file_length })
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Number of pages with at least one byte on disk.
    pub fn num_pages(&self) -> u32 {
        self.file_length.div_ceil(PAGE_SIZE as u64) as u32
    }

    /// Reads up to `PAGE_SIZE` bytes of `page_id` into `buf`.
    ///
    /// Returns the number of bytes read. A page past the end of the file reads
    /// zero bytes and a short final page reads what is there; in both cases the
    /// rest of `buf` is left untouched.
    pub fn read_page(
        &mut self,
        page_id: PageId,
        buf: &mut [u8; PAGE_SIZE],
    ) -> StorageResult<usize> {
        if page_id.0 >= self.num_pages() {
            return Ok(0);
        }

        self.file.seek(SeekFrom::Start(page_id.file_offset()))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(filled)
    }

    /// Writes `data` at the start of `page_id`, growing the file if needed.
    pub fn write_page(&mut self, page_id: PageId, data: &[u8]) -> StorageResult<()> {
        debug_assert!(data.len() <= PAGE_SIZE);

        let offset = page_id.file_offset();
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;

        self.file_length = self.file_length.max(offset + data.len() as u64);
        Ok(())
    }

    /// Forces written pages to disk and releases the handle.
    pub fn close(self) -> StorageResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}
