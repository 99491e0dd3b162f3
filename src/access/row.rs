use crate::storage::page::{PAGE_SIZE, TABLE_MAX_PAGES};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// Longest username accepted, in bytes.
pub const COLUMN_USERNAME_SIZE: usize = 32;
/// Longest email accepted, in bytes.
pub const COLUMN_EMAIL_SIZE: usize = 255;

// On-disk field widths; text columns keep room for a NUL terminator
pub const ID_SIZE: usize = std::mem::size_of::<u32>();
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;

/// A single record of the users table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

/// Writes `row` into `buf` starting at `offset`.
///
/// Text columns are NUL-padded to their full width. Text longer than the
/// column capacity is clipped to the capacity in bytes.
pub fn serialize_row(row: &Row, buf: &mut [u8], offset: usize) {
    let dest = &mut buf[offset..offset + ROW_SIZE];

    LittleEndian::write_u32(&mut dest[ID_OFFSET..ID_OFFSET + ID_SIZE], row.id);
    write_text(
        &mut dest[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
        &row.username,
        COLUMN_USERNAME_SIZE,
    );
    write_text(
        &mut dest[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE],
        &row.email,
        COLUMN_EMAIL_SIZE,
    );
}

/// Reads the row stored in `buf` at `offset`. Contents are not validated.
pub fn deserialize_row(buf: &[u8], offset: usize) -> Row {
    let src = &buf[offset..offset + ROW_SIZE];

    Row {
        id: LittleEndian::read_u32(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]),
        username: read_text(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
        email: read_text(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
    }
}

fn write_text(dest: &mut [u8], text: &str, capacity: usize) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(capacity);
    dest[..len].copy_from_slice(&bytes[..len]);
    dest[len..].fill(0);
}

fn read_text(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}
