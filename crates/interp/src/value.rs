use crate::error::RuntimeError;
use std::fmt;

/// Runtime value. `Bool` only comes out of comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "logical",
        }
    }

    pub fn as_float(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(n) => Ok(*n as f64),
            _ => Err(RuntimeError::Type(format!("expected a number, got {} {}", self.type_name(), self))),
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(RuntimeError::Type(format!(
                "expected a logical value, got {} {}",
                self.type_name(),
                self
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // whole floats keep their fractional part: 3.0, not 3
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Applies a binary operator.
///
/// A string on either side turns the operation into concatenation of both
/// textual forms, whatever the operator. Two integers use integer arithmetic;
/// every other numeric pairing is promoted to float.
pub fn binary_op(left: &Value, operator: &str, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{}{}", left, right))),
        (Value::Int(a), Value::Int(b)) => int_op(*a, operator, *b),
        _ => float_op(left.as_float()?, operator, right.as_float()?),
    }
}

fn int_op(a: i64, operator: &str, b: i64) -> Result<Value, RuntimeError> {
    let checked = |result: Option<i64>| {
        result
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Overflow(format!("{} {} {}", a, operator, b)))
    };

    match operator {
        "+" => checked(a.checked_add(b)),
        "-" => checked(a.checked_sub(b)),
        "*" => checked(a.checked_mul(b)),
        "/" => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            checked(a.checked_div(b))
        }
        "<" => Ok(Value::Bool(a < b)),
        ">" => Ok(Value::Bool(a > b)),
        "<=" => Ok(Value::Bool(a <= b)),
        ">=" => Ok(Value::Bool(a >= b)),
        "==" => Ok(Value::Bool(a == b)),
        "!=" => Ok(Value::Bool(a != b)),
        _ => Err(RuntimeError::UnsupportedOperator(operator.to_string())),
    }
}

fn float_op(a: f64, operator: &str, b: f64) -> Result<Value, RuntimeError> {
    match operator {
        "+" => Ok(Value::Float(a + b)),
        "-" => Ok(Value::Float(a - b)),
        "*" => Ok(Value::Float(a * b)),
        "/" => {
            // zero divisor faults here too, matching the integer table
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(a / b))
        }
        "<" => Ok(Value::Bool(a < b)),
        ">" => Ok(Value::Bool(a > b)),
        "<=" => Ok(Value::Bool(a <= b)),
        ">=" => Ok(Value::Bool(a >= b)),
        "==" => Ok(Value::Bool(a == b)),
        "!=" => Ok(Value::Bool(a != b)),
        _ => Err(RuntimeError::UnsupportedOperator(operator.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn test_string_concat_ignores_operator() {
        for op in ["+", "-", "*", "/", "<", "=="] {
            assert_eq!(binary_op(&s("a"), op, &Value::Int(1)).unwrap(), s("a1"));
        }
        assert_eq!(binary_op(&Value::Float(2.5), "-", &s("x")).unwrap(), s("2.5x"));
        assert_eq!(binary_op(&s("n"), "/", &Value::Int(0)).unwrap(), s("n0"));
    }

    #[test]
    fn test_integer_table() {
        assert_eq!(binary_op(&Value::Int(7), "+", &Value::Int(2)).unwrap(), Value::Int(9));
        assert_eq!(binary_op(&Value::Int(7), "-", &Value::Int(2)).unwrap(), Value::Int(5));
        assert_eq!(binary_op(&Value::Int(7), "*", &Value::Int(2)).unwrap(), Value::Int(14));
        assert_eq!(binary_op(&Value::Int(7), "/", &Value::Int(2)).unwrap(), Value::Int(3));
        assert_eq!(binary_op(&Value::Int(-7), "/", &Value::Int(2)).unwrap(), Value::Int(-3));
        assert_eq!(binary_op(&Value::Int(1), "<", &Value::Int(2)).unwrap(), Value::Bool(true));
        assert_eq!(binary_op(&Value::Int(2), "<=", &Value::Int(2)).unwrap(), Value::Bool(true));
        assert_eq!(binary_op(&Value::Int(1), ">=", &Value::Int(2)).unwrap(), Value::Bool(false));
        assert_eq!(binary_op(&Value::Int(1), "!=", &Value::Int(2)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_mixed_numbers_promote_to_float() {
        assert_eq!(binary_op(&Value::Int(1), "+", &Value::Float(0.5)).unwrap(), Value::Float(1.5));
        assert_eq!(binary_op(&Value::Float(3.0), "/", &Value::Int(2)).unwrap(), Value::Float(1.5));
        assert_eq!(binary_op(&Value::Float(1.0), "==", &Value::Int(1)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero_in_both_tables() {
        assert_eq!(binary_op(&Value::Int(1), "/", &Value::Int(0)), Err(RuntimeError::DivisionByZero));
        assert_eq!(binary_op(&Value::Float(1.0), "/", &Value::Float(0.0)), Err(RuntimeError::DivisionByZero));
        assert_eq!(binary_op(&Value::Int(1), "/", &Value::Float(-0.0)), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn test_integer_overflow() {
        let err = binary_op(&Value::Int(i64::MAX), "+", &Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "ArithmeticError");
        let err = binary_op(&Value::Int(i64::MIN), "/", &Value::Int(-1)).unwrap_err();
        assert!(matches!(err, RuntimeError::Overflow(_)));
    }

    #[test]
    fn test_logical_operand_is_type_error() {
        let err = binary_op(&Value::Bool(true), "+", &Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "TypeError");
    }

    #[test]
    fn test_logical_concatenates_with_string() {
        assert_eq!(binary_op(&s("is "), "+", &Value::Bool(true)).unwrap(), s("is true"));
    }

    #[test]
    fn test_assignment_operator_is_unsupported() {
        assert_eq!(
            binary_op(&Value::Int(1), "=", &Value::Int(2)),
            Err(RuntimeError::UnsupportedOperator("=".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(3.25).to_string(), "3.25");
        assert_eq!(Value::Float(1e16).to_string(), "10000000000000000.0");
        assert_eq!(s("hi").to_string(), "hi");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
