pub mod ast;
pub mod ast_printer;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stack;
pub mod token;
pub mod value;

use log::debug;

use crate::ast::Program;
use crate::error::Result;
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Scan and parse `source` into a [`Program`], failing on the first lexical
/// or syntax error.
pub fn parse_program(source: &str) -> Result<Program> {
    let tokens = Scanner::new(source).scan_all()?;
    debug!("Scanned {} tokens", tokens.len());

    let program = Parser::new(&tokens).parse()?;
    Ok(program)
}
