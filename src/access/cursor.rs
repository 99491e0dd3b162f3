use crate::access::row::ROW_SIZE;
use crate::access::table::Table;
use crate::storage::error::StorageResult;

/// A position within a table.
///
/// The cursor borrows the table for its whole life, so a table cannot be
/// closed or otherwise mutated while a traversal is in progress.
pub struct Cursor<'a> {
    table: &'a mut Table,
    row_num: usize,
    /// Set once the cursor is one past the last row
    end_of_table: bool,
}

impl<'a> Cursor<'a> {
    /// Positions a cursor at the first row.
    pub fn start(table: &'a mut Table) -> Self {
        let end_of_table = table.num_rows() == 0;
        Self {
            table,
            row_num: 0,
            end_of_table,
        }
    }

    /// Positions a cursor one past the last row, where the next insert goes.
    pub fn end(table: &'a mut Table) -> Self {
        let row_num = table.num_rows();
        Self {
            table,
            row_num,
            end_of_table: true,
        }
    }

    pub fn row_num(&self) -> usize {
        self.row_num
    }

    pub fn is_end(&self) -> bool {
        self.end_of_table
    }

    /// Bytes of the row under the cursor, for reading.
    pub fn value(&mut self) -> StorageResult<&[u8]> {
        let (page_id, offset) = Table::row_address(self.row_num);
        let page = self.table.pager_mut().get_page(page_id)?;
        Ok(&page[offset..offset + ROW_SIZE])
    }

    /// Bytes of the row under the cursor, for writing. The page is marked
    /// dirty up to the end of this row.
    pub fn value_mut(&mut self) -> StorageResult<&mut [u8]> {
        let (page_id, offset) = Table::row_address(self.row_num);
        let pager = self.table.pager_mut();

        pager.get_page(page_id)?;
        pager.mark_dirty(page_id, offset + ROW_SIZE);

        let page = pager.get_page(page_id)?;
        Ok(&mut page[offset..offset + ROW_SIZE])
    }

    pub fn advance(&mut self) {
        self.row_num += 1;
        if self.row_num >= self.table.num_rows() {
            self.end_of_table = true;
        }
    }
}
