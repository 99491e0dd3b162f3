// SQL module - statement preparation and execution for the command loop

pub mod ast;
pub mod parser;
pub mod statement;

pub use ast::*;
pub use parser::{parse_meta_command, prepare_statement, PrepareError};
pub use statement::{execute_statement, ExecuteResult};
