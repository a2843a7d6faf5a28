use marathi_language::{LexError, ParseError};
use thiserror::Error;

/// Failures raised while evaluating a program. Every one aborts the run.
#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("undefined function '{0}'")]
    UndefinedFunction(String),
    #[error("{0}")]
    Type(String),
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),
    #[error("invalid numeric literal '{0}'")]
    InvalidLiteral(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow evaluating {0}")]
    Overflow(String),
    #[error("function '{name}' takes {expected} argument(s) but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

impl RuntimeError {
    /// Name of the error kind as reported to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedVariable(_) | RuntimeError::UndefinedFunction(_) => "NameError",
            RuntimeError::Type(_)
            | RuntimeError::UnsupportedOperator(_)
            | RuntimeError::InvalidLiteral(_) => "TypeError",
            RuntimeError::DivisionByZero | RuntimeError::Overflow(_) => "ArithmeticError",
            RuntimeError::Arity { .. } => "ArityError",
            RuntimeError::CallDepthExceeded(_) => "RecursionError",
        }
    }
}

/// Any failure of the scan, parse, run pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("LexError: {0}")]
    Lex(#[from] LexError),
    #[error("ParseError: {0}")]
    Parse(#[from] ParseError),
    #[error("{}: {}", .0.kind(), .0)]
    Runtime(#[from] RuntimeError),
}
