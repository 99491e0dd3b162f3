use crate::access::cursor::Cursor;
use crate::access::row::{deserialize_row, serialize_row, Row, ROWS_PER_PAGE, ROW_SIZE};
use crate::config::TableConfig;
use crate::storage::buffer::Pager;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::{PageId, PAGE_SIZE};
use log::{info, warn};
use std::path::Path;

/// An append-only table of fixed-width rows stored in a single file.
///
/// Rows are packed `ROWS_PER_PAGE` to a page in insertion order. Inserts only
/// touch the in-memory page; data reaches disk when the table is closed, or
/// earlier if the page cache has to evict.
pub struct Table {
    pager: Pager,
    num_rows: usize,
    max_rows: usize,
    trailing_bytes: u64,
}

impl Table {
    /// Open the table stored at `path` with default limits, creating the file
    /// if it does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_config(path, TableConfig::default())
    }

    pub fn open_with_config(path: &Path, config: TableConfig) -> StorageResult<Self> {
        let pager = Pager::open(path, &config)?;
        let max_rows = config.max_rows();

        let (mut num_rows, trailing_bytes) = rows_in_file(pager.file_length());
        if trailing_bytes > 0 {
            warn!(
                "{:?}: ignoring {} trailing bytes that do not form a whole row",
                path, trailing_bytes
            );
        }
        if num_rows > max_rows {
            warn!(
                "{:?}: file holds {} rows but the table is limited to {}",
                path, num_rows, max_rows
            );
            num_rows = max_rows;
        }

        info!("opened table {:?} with {} rows", path, num_rows);
        Ok(Self {
            pager,
            num_rows,
            max_rows,
            trailing_bytes,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Bytes at the end of the file that were ignored at open time.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing_bytes
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub(crate) fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    /// Maps a row number to its page and the byte offset within that page.
    pub fn row_address(row_num: usize) -> (PageId, usize) {
        let page_num = row_num / ROWS_PER_PAGE;
        let row_offset = row_num % ROWS_PER_PAGE;
        (PageId(page_num as u32), row_offset * ROW_SIZE)
    }

    /// Appends a row. Identifiers are not checked for uniqueness or order.
    pub fn insert(&mut self, row: &Row) -> StorageResult<()> {
        if self.num_rows >= self.max_rows {
            return Err(StorageError::TableFull {
                max_rows: self.max_rows,
            });
        }

        let mut cursor = Cursor::end(self);
        serialize_row(row, cursor.value_mut()?, 0);
        self.num_rows += 1;

        Ok(())
    }

    /// Iterates over every row in insertion order.
    pub fn scan(&mut self) -> TableScanner<'_> {
        TableScanner {
            cursor: Cursor::start(self),
            done: false,
        }
    }

    /// Writes all rows back to disk and closes the file.
    ///
    /// Full pages are written whole. The last page is written only up to the
    /// end of its last row, so the file never gains bytes that would read back
    /// as extra rows.
    pub fn close(mut self) -> StorageResult<()> {
        let num_full_pages = self.num_rows / ROWS_PER_PAGE;

        for page_num in 0..num_full_pages {
            let page_id = PageId(page_num as u32);
            if !self.pager.is_resident(page_id) {
                continue;
            }
            self.pager.flush(page_id, PAGE_SIZE)?;
            self.pager.release(page_id);
        }

        let num_additional_rows = self.num_rows % ROWS_PER_PAGE;
        if num_additional_rows > 0 {
            let page_id = PageId(num_full_pages as u32);
            if self.pager.is_resident(page_id) {
                self.pager.flush(page_id, num_additional_rows * ROW_SIZE)?;
                self.pager.release(page_id);
            }
        }

        self.pager.close()?;
        info!("closed table with {} rows", self.num_rows);
        Ok(())
    }
}

/// Number of whole rows in a file of `file_length` bytes, and the count of
/// leftover bytes in the last page that do not make up a row.
fn rows_in_file(file_length: u64) -> (usize, u64) {
    let full_pages = file_length / PAGE_SIZE as u64;
    let tail = file_length % PAGE_SIZE as u64;
    let rows = full_pages as usize * ROWS_PER_PAGE + (tail / ROW_SIZE as u64) as usize;
    (rows, tail % ROW_SIZE as u64)
}

/// Sequential scan over a table, driven by a [`Cursor`].
pub struct TableScanner<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl Iterator for TableScanner<'_> {
    type Item = StorageResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_end() {
            return None;
        }

        match self.cursor.value() {
            Ok(buf) => {
                let row = deserialize_row(buf, 0);
                self.cursor.advance();
                Some(Ok(row))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
