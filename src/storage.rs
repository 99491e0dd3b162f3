//! Storage layer implementation for rowdb.
//!
//! Everything below the row abstraction lives here:
//!
//! - **Page**: Fixed-size (4KB) windows over the backing file, the unit of I/O
//! - **PageManager**: Reads and writes whole or partial pages to disk
//! - **Pager**: In-memory cache of pages, loaded on demand, with optional LRU
//!   eviction when configured smaller than the table
//!
//! Pages are purely an in-memory concept; nothing about them is persisted
//! other than their position in the file.

pub mod buffer;
pub mod disk;
pub mod error;
pub mod page;

pub use buffer::Pager;
pub use disk::PageManager;
pub use error::{StorageError, StorageResult};
pub use page::{PageId, PAGE_SIZE, TABLE_MAX_PAGES};
