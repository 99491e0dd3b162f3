// Statement preparation - turns one input line into a Statement

use super::ast::{MetaCommand, Statement};
use crate::access::row::{Row, COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};
use thiserror::Error;

/// Reasons an input line could not be turned into a statement. The display
/// text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong,

    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),

    #[error("Unrecognized command '{0}'")]
    UnrecognizedCommand(String),
}

pub fn parse_meta_command(input: &str) -> Result<MetaCommand, PrepareError> {
    match input {
        ".exit" => Ok(MetaCommand::Exit),
        _ => Err(PrepareError::UnrecognizedCommand(input.to_string())),
    }
}

pub fn prepare_statement(input: &str) -> Result<Statement, PrepareError> {
    if input.starts_with("insert") {
        return prepare_insert(input);
    }
    if input == "select" {
        return Ok(Statement::Select);
    }

    Err(PrepareError::UnrecognizedStatement(input.to_string()))
}

/// `insert <id> <username> <email>`; anything after the email is ignored.
fn prepare_insert(input: &str) -> Result<Statement, PrepareError> {
    let mut parts = input.split_whitespace().skip(1);
    let (Some(id), Some(username), Some(email)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(PrepareError::SyntaxError);
    };

    let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

    if username.len() > COLUMN_USERNAME_SIZE || email.len() > COLUMN_EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }

    Ok(Statement::Insert(Row::new(id, username, email)))
}
