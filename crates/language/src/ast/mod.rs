use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    VariableDeclaration {
        name: String,
        value: Expression,
    },
    Assignment {
        name: String,
        value: Expression,
    },
    If {
        condition: Condition,
        consequence: Block,
        alternative: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    For {
        init: Option<Box<Statement>>,
        condition: Expression,
        increment: Box<Statement>, // always an Assignment
        body: Block,
    },
    FunctionDeclaration {
        name: String,
        parameters: Vec<String>,
        body: Block,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    Print {
        value: Expression,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Variable(String),
    /// Integer literal, kept as written.
    Number(String),
    Float(String),
    String(String),
    /// Left-associative operator chain: `((first op e1) op e2) ...`.
    /// Kept flat so a long expression never nests deeper than one level.
    Binary {
        first: Box<Expression>,
        rest: Vec<(String, Expression)>,
    },
}

/// The restricted `identifier operator number` comparison accepted by `if`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub name: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new() -> Self {
        Block { statements: vec![] }
    }
}

impl Expression {
    /// Applies `operator` to `left` and `right`. A chain on the left is
    /// extended in place rather than wrapped.
    pub fn binary(left: Expression, operator: impl Into<String>, right: Expression) -> Self {
        match left {
            Expression::Binary { first, mut rest } => {
                rest.push((operator.into(), right));
                Expression::Binary { first, rest }
            }
            left => Expression::Binary {
                first: Box::new(left),
                rest: vec![(operator.into(), right)],
            },
        }
    }
}
