//! Interactive session: the read-prepare-execute loop behind the binary.

use crate::access::Table;
use crate::sql::{
    execute_statement, parse_meta_command, prepare_statement, ExecuteResult, MetaCommand,
};
use anyhow::{Context, Result};
use log::{debug, error};
use std::io::{BufRead, Write};

const PROMPT: &str = "db > ";

/// A command loop bound to one open table.
pub struct Session {
    table: Table,
}

impl Session {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// Reads commands from `input` until `.exit` or end of input, then closes
    /// the table.
    ///
    /// Statement errors and a full table are reported on `output` and the loop
    /// goes on. Storage and I/O failures end the session with an error, but the
    /// table is still closed first so rows inserted so far reach disk.
    pub fn run<R: BufRead, W: Write>(mut self, mut input: R, mut output: W) -> Result<()> {
        let outcome = self.command_loop(&mut input, &mut output);
        if let Err(e) = &outcome {
            error!("session ended early: {e:#}");
        }

        let closed = self.table.close().context("Error closing db file");
        outcome.and(closed)
    }

    fn command_loop<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).context("Error reading input")? == 0 {
                debug!("end of input, closing table");
                return Ok(());
            }
            // Bytes that are not UTF-8 fall through to the usual statement errors
            let line = String::from_utf8_lossy(&buf);
            let command = line.trim();

            if command.starts_with('.') {
                match parse_meta_command(command) {
                    Ok(MetaCommand::Exit) => return Ok(()),
                    Err(e) => {
                        writeln!(output, "{e}")?;
                        continue;
                    }
                }
            }

            let statement = match prepare_statement(command) {
                Ok(statement) => statement,
                Err(e) => {
                    writeln!(output, "{e}")?;
                    continue;
                }
            };

            match execute_statement(&statement, &mut self.table, output)? {
                ExecuteResult::Success => writeln!(output, "Executed.")?,
                ExecuteResult::TableFull => writeln!(output, "Error: Table full.")?,
            }
        }
    }
}
