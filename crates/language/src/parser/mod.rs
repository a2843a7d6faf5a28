use crate::ast::{Block, Condition, Expression, Statement};
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} but found {found}: {lexeme} (byte {offset})")]
    Expected {
        expected: String,
        found: TokenKind,
        lexeme: String,
        offset: usize,
    },
    #[error("unexpected token {kind}: {lexeme} (byte {offset})")]
    UnexpectedToken {
        kind: TokenKind,
        lexeme: String,
        offset: usize,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
}

impl ParseError {
    fn expected(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::Expected {
            expected: expected.into(),
            found: found.kind,
            lexeme: found.lexeme.clone(),
            offset: found.offset,
        }
    }

    fn unexpected(token: &Token) -> Self {
        ParseError::UnexpectedToken {
            kind: token.kind,
            lexeme: token.lexeme.clone(),
            offset: token.offset,
        }
    }
}

/// Recursive-descent parser with one token of lookahead.
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser { tokens, position: 0 }
    }

    fn cur_token(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn next_token(&mut self) {
        self.position += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cur_token().is_some_and(|t| t.kind == kind)
    }

    fn check_operator(&self, op: &str) -> bool {
        self.cur_token()
            .is_some_and(|t| t.kind == TokenKind::Operator && t.lexeme == op)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'t Token, ParseError> {
        match self.cur_token() {
            Some(token) if token.kind == kind => {
                self.next_token();
                Ok(token)
            }
            Some(token) => Err(ParseError::expected(kind.to_string(), token)),
            None => Err(ParseError::UnexpectedEof { expected: kind.to_string() }),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::Identifier).map(|t| t.lexeme.clone())
    }

    fn expect_assign(&mut self) -> Result<(), ParseError> {
        match self.cur_token() {
            Some(_) if self.check_operator("=") => {
                self.next_token();
                Ok(())
            }
            Some(token) => Err(ParseError::expected("OPERATOR(=)", token)),
            None => Err(ParseError::UnexpectedEof { expected: "OPERATOR(=)".to_string() }),
        }
    }

    /// Parses the whole token stream into the root block.
    pub fn parse_program(&mut self) -> Result<Block, ParseError> {
        let block = self.parse_block()?;
        match self.cur_token() {
            // only a closing brace stops a block early
            Some(token) => Err(ParseError::unexpected(token)),
            None => Ok(block),
        }
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut block = Block::new();
        while self.cur_token().is_some() && !self.check(TokenKind::RBrace) {
            block.statements.push(self.parse_statement()?);
        }
        Ok(block)
    }

    fn parse_braced_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let block = self.parse_block()?;
        self.expect(TokenKind::RBrace)?;
        Ok(block)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let Some(token) = self.cur_token() else {
            return Err(ParseError::UnexpectedEof { expected: "statement".to_string() });
        };
        log::trace!("statement starting at {}", token);

        match token.kind {
            TokenKind::VarDecl => self.parse_variable_declaration(true),
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::FunctionDecl => self.parse_function_declaration(),
            TokenKind::Identifier => {
                let name = self.expect_identifier()?;
                if self.check_operator("=") {
                    self.parse_assignment(name, true)
                } else {
                    self.parse_function_call(name)
                }
            }
            _ => Err(ParseError::unexpected(token)),
        }
    }

    // --- Variable Declaration ---
    fn parse_variable_declaration(&mut self, terminated: bool) -> Result<Statement, ParseError> {
        self.expect(TokenKind::VarDecl)?;
        let name = self.expect_identifier()?;
        self.expect_assign()?;

        let value = match self.cur_token() {
            Some(t) if t.kind == TokenKind::Number => Expression::Number(t.lexeme.clone()),
            Some(t) if t.kind == TokenKind::Float => Expression::Float(t.lexeme.clone()),
            Some(t) if t.kind == TokenKind::String => Expression::String(t.lexeme.clone()),
            Some(t) => return Err(ParseError::expected("NUMBER, FLOAT or STRING", t)),
            None => {
                return Err(ParseError::UnexpectedEof { expected: "NUMBER, FLOAT or STRING".to_string() })
            }
        };
        self.next_token();

        if terminated {
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(Statement::VariableDeclaration { name, value })
    }

    // The identifier has already been consumed.
    fn parse_assignment(&mut self, name: String, terminated: bool) -> Result<Statement, ParseError> {
        self.expect_assign()?;
        let value = self.parse_expression()?;
        if terminated {
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(Statement::Assignment { name, value })
    }

    fn parse_function_call(&mut self, name: String) -> Result<Statement, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = vec![];

        if !self.check(TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.next_token();
                arguments.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::FunctionCall { name, arguments })
    }

    // --- Function Declaration ---
    fn parse_function_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::FunctionDecl)?;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let mut parameters = vec![];
        if !self.check(TokenKind::RParen) {
            parameters.push(self.expect_identifier()?);
            while self.check(TokenKind::Comma) {
                self.next_token();
                parameters.push(self.expect_identifier()?);
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_braced_block()?;
        Ok(Statement::FunctionDeclaration { name, parameters, body })
    }

    fn parse_print_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LParen)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Print { value })
    }

    // --- If ---
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::RParen)?;

        let consequence = self.parse_braced_block()?;

        let alternative = if self.check(TokenKind::Else) {
            self.next_token();
            Some(self.parse_braced_block()?)
        } else {
            None
        };

        Ok(Statement::If { condition, consequence, alternative })
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let name = self.expect_identifier()?;
        let operator = self.expect(TokenKind::Operator)?.lexeme.clone();
        let value = self.expect(TokenKind::Number)?.lexeme.clone();
        Ok(Condition { name, operator, value })
    }

    // --- While ---
    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_braced_block()?;
        Ok(Statement::While { condition, body })
    }

    // --- For ---
    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = if self.check(TokenKind::VarDecl) {
            Some(Box::new(self.parse_variable_declaration(false)?))
        } else if self.check(TokenKind::Identifier) {
            let name = self.expect_identifier()?;
            Some(Box::new(self.parse_assignment(name, false)?))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        let condition = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;

        let name = self.expect_identifier()?;
        let increment = Box::new(self.parse_assignment(name, false)?);
        self.expect(TokenKind::RParen)?;

        let body = self.parse_braced_block()?;
        Ok(Statement::For { init, condition, increment, body })
    }

    // --- Expression Parsing ---
    // Every operator shares one precedence level and associates to the left.
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_primary()?;

        while let Some(token) = self.cur_token().filter(|t| t.kind == TokenKind::Operator) {
            self.next_token();
            let right = self.parse_primary()?;
            left = Expression::binary(left, token.lexeme.clone(), right);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.cur_token() else {
            return Err(ParseError::UnexpectedEof { expected: "expression".to_string() });
        };
        let expr = match token.kind {
            TokenKind::Identifier => Expression::Variable(token.lexeme.clone()),
            TokenKind::Number => Expression::Number(token.lexeme.clone()),
            TokenKind::Float => Expression::Float(token.lexeme.clone()),
            TokenKind::String => Expression::String(token.lexeme.clone()),
            _ => return Err(ParseError::unexpected(token)),
        };
        self.next_token();
        Ok(expr)
    }
}

/// Parses a token sequence into the root block.
pub fn parse(tokens: &[Token]) -> Result<Block, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn parse_source(input: &str) -> Block {
        let tokens = scan(input).expect("scan failed");
        parse(&tokens).unwrap_or_else(|e| panic!("Parser error: {}", e))
    }

    fn parse_err(input: &str) -> ParseError {
        let tokens = scan(input).expect("scan failed");
        parse(&tokens).expect_err("expected a parse error")
    }

    fn num(text: &str) -> Expression {
        Expression::Number(text.to_string())
    }

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    #[test]
    fn test_print_binary() {
        let prog = parse_source("Chapa(1+2);");
        assert_eq!(
            prog.statements,
            vec![Statement::Print { value: Expression::binary(num("1"), "+", num("2")) }]
        );
    }

    #[test]
    fn test_variable_declaration() {
        let prog = parse_source("He aahe x = 5; He aahe y = 2.5; He aahe s = \"hi\";");
        assert_eq!(
            prog.statements,
            vec![
                Statement::VariableDeclaration { name: "x".into(), value: num("5") },
                Statement::VariableDeclaration { name: "y".into(), value: Expression::Float("2.5".into()) },
                Statement::VariableDeclaration { name: "s".into(), value: Expression::String("hi".into()) },
            ]
        );
    }

    #[test]
    fn test_variable_declaration_requires_literal() {
        let err = parse_err("He aahe x = y;");
        assert!(matches!(err, ParseError::Expected { found: TokenKind::Identifier, .. }));
    }

    #[test]
    fn test_expression_is_left_associative() {
        let prog = parse_source("x = 1 + 2 * 3;");
        let expected = Expression::binary(Expression::binary(num("1"), "+", num("2")), "*", num("3"));
        assert_eq!(prog.statements, vec![Statement::Assignment { name: "x".into(), value: expected }]);
    }

    #[test]
    fn test_long_expression_stays_flat() {
        let source = format!("x = 0{};", " + 1".repeat(100_000));
        let prog = parse_source(&source);
        match &prog.statements[0] {
            Statement::Assignment { value: Expression::Binary { first, rest }, .. } => {
                assert_eq!(**first, num("0"));
                assert_eq!(rest.len(), 100_000);
                assert!(rest.iter().all(|(op, operand)| op == "+" && *operand == num("1")));
            }
            other => panic!("expected an operator chain, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else() {
        let prog = parse_source("Jar (x > 3) { Chapa(x); } Nahitar { Chapa(0); }");
        match &prog.statements[0] {
            Statement::If { condition, consequence, alternative } => {
                assert_eq!(
                    condition,
                    &Condition { name: "x".into(), operator: ">".into(), value: "3".into() }
                );
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(alternative.as_ref().map(|b| b.statements.len()), Some(1));
            }
            other => panic!("Expected If statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_condition_is_restricted() {
        let err = parse_err("Jar (x > y) { }");
        assert_eq!(
            err,
            ParseError::Expected {
                expected: "NUMBER".into(),
                found: TokenKind::Identifier,
                lexeme: "y".into(),
                offset: 9,
            }
        );
    }

    #[test]
    fn test_while_loop() {
        let prog = parse_source("joparyant (x < 3) { x = x + 1; }");
        match &prog.statements[0] {
            Statement::While { condition, body } => {
                assert_eq!(condition, &Expression::binary(var("x"), "<", num("3")));
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected While statement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop() {
        let prog = parse_source("Suruwaat (He aahe i = 0; i < 3; i = i + 1) { Chapa(i); }");
        match &prog.statements[0] {
            Statement::For { init, condition, increment, body } => {
                assert_eq!(
                    init.as_deref(),
                    Some(&Statement::VariableDeclaration { name: "i".into(), value: num("0") })
                );
                assert_eq!(condition, &Expression::binary(var("i"), "<", num("3")));
                assert_eq!(
                    increment.as_ref(),
                    &Statement::Assignment { name: "i".into(), value: Expression::binary(var("i"), "+", num("1")) }
                );
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected For statement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop_with_assignment_or_no_init() {
        let prog = parse_source("Suruwaat (i = 0; i < 3; i = i + 1) { } Suruwaat (; i < 3; i = i + 1) { }");
        assert!(matches!(&prog.statements[0], Statement::For { init: Some(_), .. }));
        assert!(matches!(&prog.statements[1], Statement::For { init: None, .. }));
    }

    #[test]
    fn test_function_declaration_and_call() {
        let prog = parse_source("Karya add(a, b) { Chapa(a + b); } add(1, 2.5);");
        assert_eq!(prog.statements.len(), 2);
        match &prog.statements[0] {
            Statement::FunctionDeclaration { name, parameters, body } => {
                assert_eq!(name, "add");
                assert_eq!(parameters, &vec!["a".to_string(), "b".to_string()]);
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected FunctionDeclaration, got {:?}", other),
        }
        assert_eq!(
            prog.statements[1],
            Statement::FunctionCall {
                name: "add".into(),
                arguments: vec![num("1"), Expression::Float("2.5".into())],
            }
        );
    }

    #[test]
    fn test_call_without_arguments() {
        let prog = parse_source("Karya hello() { Chapa(\"hi\"); } hello();");
        assert_eq!(prog.statements[1], Statement::FunctionCall { name: "hello".into(), arguments: vec![] });
    }

    #[test]
    fn test_identifier_needs_assign_or_call() {
        let err = parse_err("x + 1;");
        assert!(matches!(err, ParseError::Expected { ref expected, found: TokenKind::Operator, .. } if expected == "LPAREN"));
    }

    #[test]
    fn test_call_keyword_is_not_a_statement() {
        let err = parse_err("Bolav greet();");
        assert!(matches!(err, ParseError::UnexpectedToken { kind: TokenKind::CallKeyword, .. }));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        assert_eq!(
            parse_err("Chapa(1"),
            ParseError::UnexpectedEof { expected: "RPAREN".into() }
        );
        assert_eq!(
            parse_err("joparyant (x < 1) { Chapa(x);"),
            ParseError::UnexpectedEof { expected: "RBRACE".into() }
        );
    }

    #[test]
    fn test_stray_closing_brace_at_top_level() {
        let err = parse_err("Chapa(1); }");
        assert!(matches!(err, ParseError::UnexpectedToken { kind: TokenKind::RBrace, .. }));
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse_source("  \n"), Block::new());
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let tokens = scan("He aahe x = 1; joparyant (x < 3) { Chapa(x); x = x + 1; }").unwrap();
        let first = parse(&tokens).unwrap();
        let second = parse(&tokens).unwrap();
        assert_eq!(first, second);
    }
}
