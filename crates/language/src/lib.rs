//! Front end for the Marathi scripting language: scanner, AST and parser.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use lexer::{LexError, Token, TokenKind, scan};
pub use parser::{ParseError, parse};
