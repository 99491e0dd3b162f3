// Statement execution against a table

use super::ast::Statement;
use crate::access::{Row, Table};
use crate::storage::StorageError;
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteResult {
    Success,
    TableFull,
}

/// Runs a prepared statement. Selected rows are written to `out`, one per line.
///
/// A full table is reported through the returned [`ExecuteResult`]; any other
/// failure is an error the caller is not expected to recover from.
pub fn execute_statement<W: Write>(
    statement: &Statement,
    table: &mut Table,
    out: &mut W,
) -> Result<ExecuteResult> {
    match statement {
        Statement::Insert(row) => execute_insert(row, table),
        Statement::Select => execute_select(table, out),
    }
}

fn execute_insert(row: &Row, table: &mut Table) -> Result<ExecuteResult> {
    match table.insert(row) {
        Ok(()) => Ok(ExecuteResult::Success),
        Err(StorageError::TableFull { .. }) => Ok(ExecuteResult::TableFull),
        Err(e) => Err(e).context("Failed to insert row"),
    }
}

fn execute_select<W: Write>(table: &mut Table, out: &mut W) -> Result<ExecuteResult> {
    for row in table.scan() {
        let row = row.context("Failed to read row")?;
        writeln!(out, "{row}")?;
    }
    Ok(ExecuteResult::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use tempfile::tempdir;

    #[test]
    fn test_insert_and_select() -> Result<()> {
        let dir = tempdir()?;
        let mut table = Table::open(&dir.path().join("test.db"))?;
        let mut out = Vec::new();

        let insert = Statement::Insert(Row::new(1, "user1", "person1@example.com"));
        assert_eq!(
            execute_statement(&insert, &mut table, &mut out)?,
            ExecuteResult::Success
        );
        assert!(out.is_empty());

        assert_eq!(
            execute_statement(&Statement::Select, &mut table, &mut out)?,
            ExecuteResult::Success
        );
        assert_eq!(String::from_utf8(out)?, "(1, user1, person1@example.com)\n");

        Ok(())
    }

    #[test]
    fn test_table_full_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let config = TableConfig::default().with_max_pages(1);
        let mut table = Table::open_with_config(&dir.path().join("test.db"), config)?;
        let mut out = Vec::new();

        let insert = Statement::Insert(Row::new(1, "u", "e"));
        for _ in 0..table.max_rows() {
            execute_statement(&insert, &mut table, &mut out)?;
        }
        assert_eq!(
            execute_statement(&insert, &mut table, &mut out)?,
            ExecuteResult::TableFull
        );
        assert_eq!(table.num_rows(), table.max_rows());

        Ok(())
    }
}
