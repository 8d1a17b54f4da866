//! Rox: a tree‑walking interpreter for an extended Lox dialect with classes,
//! closures, lambdas, bitwise/compound/ternary operators and `++`/`--`.
//!
//! The pipeline is `scanner` → `parser` → `resolver` → `interpreter`;
//! [`run`] drives all four over one source text.

pub mod ast;
pub mod ast_printer;
pub mod config;
pub mod environment;
pub mod error;
pub mod interpreter;
mod natives;
pub mod parser;
pub mod resolver;
pub mod scanner;
mod stack;
pub mod token;
pub mod value;

use std::io::{BufRead, Write};

use log::info;

pub use config::RunConfig;
pub use error::{LoxError, RunError};
pub use interpreter::Interpreter;

use parser::Parser;
use resolver::Resolver;

/// Scans, parses, resolves and executes `source`.
///
/// Program output and the implicit result go to `output`; `readln` reads
/// from `input`.  Nothing executes unless every static phase succeeded.
pub fn run(
    source: &str,
    config: &RunConfig,
    mut output: impl Write,
    input: impl BufRead,
) -> Result<(), RunError> {
    let tokens = scanner::scan_tokens(source).map_err(RunError::Static)?;
    let statements = Parser::new(&tokens).parse().map_err(RunError::Static)?;
    let locals = Resolver::new()
        .resolve(&statements)
        .map_err(RunError::Static)?;

    let implicit = {
        let mut interpreter =
            Interpreter::with_io(&mut output, input).with_max_call_depth(config.max_call_depth);
        interpreter.resolve(locals);

        interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)?
            .map(|value| value.to_string())
    };

    if let Some(text) = implicit.filter(|_| config.show_implicit_result) {
        info!("Writing implicit result: {}", text);
        writeln!(output, "{}", text).map_err(|e| RunError::Runtime(e.into()))?;
    }

    Ok(())
}
