//! Tree-walking evaluator: executes a parsed block statement by statement.

use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::{Value, binary_op};
use marathi_language::ast::{Block, Condition, Expression, Statement};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Deepest allowed nesting of function calls.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: 100 }
    }
}

/// A registered function declaration.
#[derive(Debug)]
struct Function {
    parameters: Vec<String>,
    body: Block,
}

pub struct Interpreter {
    env: Environment,
    functions: HashMap<String, Rc<Function>>,
    config: InterpreterConfig,
    /// Printed lines, in execution order.
    output: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            env: Environment::new(),
            functions: HashMap::new(),
            config,
            output: Vec::new(),
        }
    }

    /// Runs the root block. Stops at the first error; lines printed before it
    /// stay available through [`Interpreter::output`].
    pub fn run(&mut self, program: &Block) -> Result<(), RuntimeError> {
        self.execute_block(program)
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    /// All printed lines joined with newlines.
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    /// The end-of-run report block.
    pub fn report(&self) -> String {
        let mut report = String::from("PROGRAM OUTPUT :");
        for line in &self.output {
            report.push_str("\n                 ");
            report.push_str(line);
        }
        report
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    fn execute_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for statement in &block.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::VariableDeclaration { name, value } | Statement::Assignment { name, value } => {
                let value = self.evaluate_expression(value)?;
                log::debug!("bind {} = {}", name, value);
                self.env.set(name, value);
            }
            Statement::Print { value } => {
                let text = self.evaluate_expression(value)?.to_string();
                log::info!("output: {}", text);
                self.output.push(text);
            }
            Statement::If { condition, consequence, alternative } => {
                if self.evaluate_condition(condition)? {
                    log::debug!("if: then branch");
                    self.execute_block(consequence)?;
                } else if let Some(alternative) = alternative {
                    log::debug!("if: else branch");
                    self.execute_block(alternative)?;
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate_logical(condition)? {
                    self.execute_block(body)?;
                }
            }
            Statement::For { init, condition, increment, body } => {
                if let Some(init) = init {
                    self.execute_statement(init)?;
                }
                while self.evaluate_logical(condition)? {
                    self.execute_block(body)?;
                    self.execute_statement(increment)?;
                }
            }
            Statement::FunctionDeclaration { name, parameters, body } => {
                log::debug!("declare function {}({})", name, parameters.join(", "));
                let function = Function { parameters: parameters.clone(), body: body.clone() };
                self.functions.insert(name.clone(), Rc::new(function));
            }
            Statement::FunctionCall { name, arguments } => self.call_function(name, arguments)?,
        }
        Ok(())
    }

    fn call_function(&mut self, name: &str, arguments: &[Expression]) -> Result<(), RuntimeError> {
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction(name.to_string()))?;

        if arguments.len() != function.parameters.len() {
            return Err(RuntimeError::Arity {
                name: name.to_string(),
                expected: function.parameters.len(),
                found: arguments.len(),
            });
        }

        let mut frame = HashMap::new();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            frame.insert(parameter.clone(), self.evaluate_expression(argument)?);
        }

        if self.env.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.config.max_call_depth));
        }

        log::debug!("call {} at depth {}", name, self.env.depth() + 1);
        self.env.push_frame(frame);
        let result = self.execute_block(&function.body);
        self.env.pop_frame();
        result
    }

    fn evaluate_condition(&self, condition: &Condition) -> Result<bool, RuntimeError> {
        let Condition { name, operator, value } = condition;
        let current = self
            .env
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))?;
        log::debug!("if condition: {} ({}) {} {}", name, current, operator, value);

        let left: i64 = current.to_string().parse().map_err(|_| {
            RuntimeError::Type(format!("'{}' holds {} {}, not an integer", name, current.type_name(), current))
        })?;
        let right: i64 = value
            .parse()
            .map_err(|_| RuntimeError::InvalidLiteral(value.clone()))?;

        match operator.as_str() {
            "==" => Ok(left == right),
            "<" => Ok(left < right),
            ">" => Ok(left > right),
            "<=" => Ok(left <= right),
            ">=" => Ok(left >= right),
            _ => Err(RuntimeError::UnsupportedOperator(operator.clone())),
        }
    }

    fn evaluate_logical(&self, expression: &Expression) -> Result<bool, RuntimeError> {
        self.evaluate_expression(expression)?.as_bool()
    }

    fn evaluate_expression(&self, expression: &Expression) -> Result<Value, RuntimeError> {
        let value = match expression {
            Expression::Variable(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))?,
            Expression::Number(text) => text
                .parse()
                .map(Value::Int)
                .map_err(|_| RuntimeError::InvalidLiteral(text.clone()))?,
            Expression::Float(text) => text
                .parse()
                .map(Value::Float)
                .map_err(|_| RuntimeError::InvalidLiteral(text.clone()))?,
            Expression::String(text) => Value::Str(text.clone()),
            Expression::Binary { first, rest } => {
                let mut value = self.evaluate_expression(first)?;
                for (operator, operand) in rest {
                    let operand = self.evaluate_expression(operand)?;
                    value = binary_op(&value, operator, &operand)?;
                }
                log::trace!("{} operator(s) => {}", rest.len(), value);
                value
            }
        };
        Ok(value)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a program in a fresh interpreter and returns its printed lines.
pub fn run_program(program: &Block) -> Result<Vec<String>, RuntimeError> {
    let mut interpreter = Interpreter::new();
    interpreter.run(program)?;
    Ok(interpreter.into_output())
}
