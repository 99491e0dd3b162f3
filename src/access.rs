//! Access layer for row-oriented operations.
//!
//! This module maps logical rows onto pages:
//!
//! - **Row**: The fixed-width record and its binary layout
//! - **Table**: Row count, row addressing, insert, scan and close
//! - **Cursor**: A borrowed position used to walk or append to a table
//!
//! Higher layers work with [`Row`] values and never see page offsets.

pub mod cursor;
pub mod row;
pub mod table;

pub use cursor::Cursor;
pub use row::{deserialize_row, serialize_row, Row, ROWS_PER_PAGE, ROW_SIZE, TABLE_MAX_ROWS};
pub use table::{Table, TableScanner};
