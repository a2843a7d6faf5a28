use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Keywords
    VarDecl,
    If,
    Else,
    Print,
    While,
    For,
    FunctionDecl,
    CallKeyword,

    // Literals
    Identifier,
    Number,
    Float,
    String,

    Operator,

    // Delimiters
    #[serde(rename = "LPAREN")]
    LParen,
    #[serde(rename = "RPAREN")]
    RParen,
    #[serde(rename = "LBRACE")]
    LBrace,
    #[serde(rename = "RBRACE")]
    RBrace,
    Semicolon,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::VarDecl => "VAR_DECL",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Print => "PRINT",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::FunctionDecl => "FUNCTION_DECL",
            TokenKind::CallKeyword => "CALL_KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
        };
        f.write_str(name)
    }
}

/// Keyword table, matched as exact-case prefixes in this order.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("He aahe", TokenKind::VarDecl),
    ("Jar", TokenKind::If),
    ("Nahitar", TokenKind::Else),
    ("Chapa", TokenKind::Print),
    ("joparyant", TokenKind::While),
    ("Suruwaat", TokenKind::For),
    ("Karya", TokenKind::FunctionDecl),
    ("Bolav", TokenKind::CallKeyword),
];

const TWO_CHAR_OPERATORS: &[&str] = &["==", "!=", "<=", ">="];
const ONE_CHAR_OPERATORS: &str = "<>=+-*/";

/// A scanned token. `offset` is the byte position of the lexeme in the source.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), offset }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.lexeme)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at byte {offset} (line {line})")]
    UnexpectedCharacter { ch: char, offset: usize, line: usize },
    #[error("unterminated string literal starting at byte {offset} (line {line})")]
    UnterminatedString { offset: usize, line: usize },
    #[error("malformed number '{lexeme}': extra decimal point at byte {offset} (line {line})")]
    MalformedNumber { lexeme: String, offset: usize, line: usize },
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    pub line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0, line: 1 }
    }

    fn ch(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn read_char(&mut self) {
        if let Some(ch) = self.ch() {
            if ch == '\n' {
                self.line += 1;
            }
            self.position += ch.len_utf8();
        }
    }

    fn advance_by(&mut self, len: usize) {
        let end = self.position + len;
        while self.position < end {
            self.read_char();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.ch() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.read_char();
            } else {
                break;
            }
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let input = self.input;
        let start = self.position;
        let rest = &input[start..];
        let Some(ch) = self.ch() else {
            return Ok(None);
        };

        for (keyword, kind) in KEYWORDS {
            if rest.starts_with(*keyword) {
                self.advance_by(keyword.len());
                return Ok(Some(Token::new(*kind, *keyword, start)));
            }
        }

        if ch == '"' {
            return self.read_string().map(Some);
        }

        if let Some(op) = TWO_CHAR_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.advance_by(2);
            return Ok(Some(Token::new(TokenKind::Operator, *op, start)));
        }

        let single = match ch {
            c if ONE_CHAR_OPERATORS.contains(c) => Some(TokenKind::Operator),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ';' => Some(TokenKind::Semicolon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.read_char();
            return Ok(Some(Token::new(kind, ch.to_string(), start)));
        }

        if ch.is_ascii_digit() {
            return self.read_number().map(Some);
        }

        if ch.is_alphabetic() {
            return Ok(Some(self.read_identifier()));
        }

        Err(LexError::UnexpectedCharacter { ch, offset: start, line: self.line })
    }

    /// Scans the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            log::trace!("token {}", token);
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn read_identifier(&mut self) -> Token {
        let position = self.position;
        while let Some(ch) = self.ch() {
            if ch.is_alphanumeric() || ch == '_' {
                self.read_char();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Identifier, &self.input[position..self.position], position)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let position = self.position;
        let line = self.line;
        let mut seen_dot = false;
        // offset of the first extra '.'
        let mut fault = None;

        while let Some(ch) = self.ch() {
            if ch.is_ascii_digit() {
                self.read_char();
            } else if ch == '.' {
                if seen_dot && fault.is_none() {
                    fault = Some(self.position);
                }
                seen_dot = true;
                self.read_char();
            } else {
                break;
            }
        }

        let lexeme = &self.input[position..self.position];
        if let Some(offset) = fault {
            return Err(LexError::MalformedNumber { lexeme: lexeme.to_string(), offset, line });
        }
        let kind = if seen_dot { TokenKind::Float } else { TokenKind::Number };
        Ok(Token::new(kind, lexeme, position))
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let line = self.line;
        self.read_char(); // opening "

        let content_start = self.position;
        loop {
            match self.ch() {
                Some('"') => break,
                Some(_) => self.read_char(),
                None => return Err(LexError::UnterminatedString { offset: start, line }),
            }
        }
        let literal = &self.input[content_start..self.position];
        self.read_char(); // closing "
        Ok(Token::new(TokenKind::String, literal, start))
    }
}

/// Converts source text into its token sequence.
pub fn scan(text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(text).tokenize()
}
