use std::fmt;

pub const PAGE_SIZE: usize = 4096;

/// Default upper bound on the number of pages a table may address.
pub const TABLE_MAX_PAGES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Byte offset of the first byte of this page in the backing file.
    pub fn file_offset(self) -> u64 {
        self.0 as u64 * PAGE_SIZE as u64
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_offset() {
        assert_eq!(PageId(0).file_offset(), 0);
        assert_eq!(PageId(1).file_offset(), 4096);
        assert_eq!(PageId(99).file_offset(), 99 * 4096);
    }
}
