//! Evaluator for the Marathi scripting language.
//! Walks the AST produced by `marathi-language` and collects printed output.

pub mod env;
pub mod error;
pub mod interpreter;
pub mod value;

pub use error::{Error, RuntimeError};
pub use interpreter::{Interpreter, InterpreterConfig, run_program};
pub use value::Value;

use marathi_language::{parse, scan};

/// Scans, parses and runs `source` in a fresh interpreter.
pub fn run_source(source: &str) -> Result<Vec<String>, Error> {
    run_source_with(source, InterpreterConfig::default())
}

pub fn run_source_with(source: &str, config: InterpreterConfig) -> Result<Vec<String>, Error> {
    let tokens = scan(source)?;
    let program = parse(&tokens)?;
    let mut interpreter = Interpreter::with_config(config);
    interpreter.run(&program)?;
    Ok(interpreter.into_output())
}
