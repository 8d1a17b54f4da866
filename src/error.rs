//! Centralised error hierarchy for the interpreter.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself; rendering is the job of
//! whoever receives the error (the binary writes them to stderr).

use std::io;
use thiserror::Error;

use log::debug;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source position.
    #[error("[line {line}:{column}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,

        /// 1‑based column where the error occurred.
        column: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}:{column}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
        /// ` at 'x'`, ` at end`, …
        location: String,
    },

    /// Static‑analysis or resolution failure (e.g. early‑binding errors).
    #[error("[line {line}:{column}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        column: usize,
        location: String,
    },

    /// Runtime evaluation error.
    #[error("{message}\n[line {line}:{column}]")]
    Runtime {
        message: String,
        line: usize,
        column: usize,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, column: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex {
            message,
            line,
            column,
        }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            column: token.column,
            location: location(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            line: token.line,
            column: token.column,
            location: location(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Runtime error: line={}, msg={}", token.line, message);

        LoxError::Runtime {
            message,
            line: token.line,
            column: token.column,
        }
    }

    /// The bare message, without position decoration.
    pub fn message(&self) -> String {
        match self {
            LoxError::Lex { message, .. }
            | LoxError::Parse { message, .. }
            | LoxError::Resolve { message, .. }
            | LoxError::Runtime { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// `(line, column)` for errors that carry a source position.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            LoxError::Lex { line, column, .. }
            | LoxError::Parse { line, column, .. }
            | LoxError::Resolve { line, column, .. }
            | LoxError::Runtime { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

fn location(token: &Token<'_>) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else if token.is_synthetic() {
        " at end of line".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Failure of a whole `run`: either the program was rejected before
/// execution, or it aborted on the first runtime error.
#[derive(Debug, Error)]
pub enum RunError {
    /// Lexical, syntax or binding errors; the program was never executed.
    #[error("{}", render_all(.0))]
    Static(Vec<LoxError>),

    /// The first runtime error; remaining statements were skipped.
    #[error(transparent)]
    Runtime(LoxError),
}

impl RunError {
    /// Conventional sysexits code: 65 (data error) or 70 (software error).
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Static(_) => 65,
            RunError::Runtime(_) => 70,
        }
    }

    /// Every diagnostic carried by this failure.
    pub fn diagnostics(&self) -> Vec<&LoxError> {
        match self {
            RunError::Static(errors) => errors.iter().collect(),
            RunError::Runtime(error) => vec![error],
        }
    }
}

fn render_all(errors: &[LoxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
