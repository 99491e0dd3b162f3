// Prepared statements and meta-commands

use crate::access::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// Non-SQL commands, written with a leading dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
}
