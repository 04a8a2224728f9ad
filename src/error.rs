//! Centralised error hierarchy for the **Skeptical interpreter**.
//!
//! The scanner and parser report [`SkepticalError::Lex`] / [`SkepticalError::Parse`]
//! with the offending line.  The evaluator produces a bare [`ErrorKind`]; the
//! statement executor attaches the line of the failing statement, yielding a
//! [`RuntimeError`].  Everything converts into [`SkepticalError`] so the CLI
//! can work with a single `Result<T>` alias.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SkepticalError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// Runtime evaluation error, located at a statement.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Malformed configuration file.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl SkepticalError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        SkepticalError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        SkepticalError::Parse { message, line }
    }
}

/// What went wrong while evaluating an expression or executing a statement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("Undefined variable '{0}'.")]
    UnboundIdentifier(String),

    /// Division by zero or a power with no finite result.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Invalid numeric input: {0}")]
    InputFormat(String),

    #[error("Undefined function '{0}'.")]
    UndefinedFunction(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Expected {expected} arguments but got {found} when calling '{name}'.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Stack overflow: call depth exceeded {limit}.")]
    StackOverflow { limit: usize },

    #[error("Cannot reassign constant '{0}'.")]
    ConstantReassignment(String),

    /// `rand` bounds given in the wrong order.
    #[error("Invalid range: {min} is greater than {max}.")]
    InvalidRange { min: i64, max: i64 },

    /// The input or output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ErrorKind {
    /// Attach the 1‑based source line of the statement that failed.
    pub fn at(self, line: usize) -> RuntimeError {
        RuntimeError { kind: self, line }
    }
}

/// An [`ErrorKind`] located at the statement that raised it.
#[derive(Debug, Error)]
#[error("[line {line}] Runtime error: {kind}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub line: usize,
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, SkepticalError>;
