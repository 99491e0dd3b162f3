//! Storage layer error types.

use crate::storage::page::PageId;
use thiserror::Error;

/// Errors that can occur in the storage layer.
///
/// Only [`StorageError::TableFull`] is recoverable: the caller reports it and
/// keeps using the table. Everything else means the table can no longer be
/// trusted and the caller should close down.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Table full: cannot hold more than {max_rows} rows")]
    TableFull { max_rows: usize },

    #[error("Tried to fetch page number out of bounds: {page_id} >= {max_pages}")]
    PageOutOfBounds { page_id: PageId, max_pages: usize },

    #[error("Tried to flush page {0} which is not resident")]
    PageNotResident(PageId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::TableFull { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_tiers() {
        assert!(StorageError::TableFull { max_rows: 10 }.is_recoverable());
        assert!(!StorageError::PageNotResident(PageId(3)).is_recoverable());
        assert!(!StorageError::PageOutOfBounds {
            page_id: PageId(100),
            max_pages: 100
        }
        .is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert!(!StorageError::from(io).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::PageOutOfBounds {
            page_id: PageId(101),
            max_pages: 100,
        };
        assert_eq!(
            err.to_string(),
            "Tried to fetch page number out of bounds: 101 >= 100"
        );
        assert_eq!(
            StorageError::PageNotResident(PageId(2)).to_string(),
            "Tried to flush page 2 which is not resident"
        );
    }
}
