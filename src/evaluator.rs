//! Shared expression evaluation for the filter and custom-property
//! languages.
//!
//! Evaluation is a pure tree walk: no shared mutable state, no caching on
//! the nodes, each call independent. The filter language enters through
//! [`eval_bool`], the custom-property language through [`eval`]; the two
//! differ only in the accepted final value kind.

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::context::EvalContext;
use crate::functions;
use crate::glob;
use crate::value::Value;

/// Errors that can occur while evaluating a well-formed expression.
///
/// Each error fails exactly the one evaluation call it arose in; a parsed
/// expression stays valid and reusable for other contexts.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operator applied to operand kinds outside its contract
    TypeError(String),

    /// Division by zero
    DivisionByZero,

    /// Call to a function that is not registered
    UnknownFunction(String),

    /// Function called with the wrong number of arguments
    BadArity {
        name: String,
        expected: String,
        actual: usize,
    },

    /// Function called with an argument of the wrong kind
    BadArgument {
        name: String,
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// Right operand of `=~` or `~` is not valid pattern syntax
    InvalidPattern { pattern: String, message: String },

    /// A filter expression produced something other than a boolean
    NotBoolean(&'static str),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            EvalError::BadArity {
                name,
                expected,
                actual,
            } => write!(
                f,
                "function '{}' expects {} argument(s), got {}",
                name, expected, actual
            ),
            EvalError::BadArgument {
                name,
                index,
                expected,
                actual,
            } => write!(
                f,
                "function '{}' expects a {} as argument {}, got {}",
                name, expected, index, actual
            ),
            EvalError::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern '{}': {}", pattern, message)
            }
            EvalError::NotBoolean(kind) => {
                write!(f, "filter must produce a boolean, got {}", kind)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluate an expression to any value kind (custom-property entry point).
pub fn eval(expr: &Expr, ctx: &EvalContext) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Path(path) => Ok(ctx.resolve(path)),
        Expr::List(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(eval(element, ctx)?);
            }
            Ok(Value::List(items))
        }
        Expr::Unary { op, operand } => apply_unary(*op, eval(operand, ctx)?),
        Expr::Binary { op, left, right } => match op {
            // `and`/`or` short-circuit: the right operand is not evaluated
            // when the left already determines the result, so errors in
            // irrelevant branches never surface.
            BinOp::And => {
                if !eval_operand_bool(BinOp::And, left, ctx)? {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(eval_operand_bool(BinOp::And, right, ctx)?))
            }
            BinOp::Or => {
                if eval_operand_bool(BinOp::Or, left, ctx)? {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(eval_operand_bool(BinOp::Or, right, ctx)?))
            }
            _ => {
                let left_val = eval(left, ctx)?;
                let right_val = eval(right, ctx)?;
                apply_binop(*op, &left_val, &right_val)
            }
        },
        Expr::Call { name, args } => eval_call(name, args, ctx),
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => match eval(condition, ctx)? {
            // Only the selected branch is evaluated.
            Value::Boolean(true) => eval(then_branch, ctx),
            Value::Boolean(false) => eval(else_branch, ctx),
            other => Err(EvalError::TypeError(format!(
                "conditional condition must be a boolean, got {}",
                other.kind()
            ))),
        },
    }
}

/// Evaluate an expression and require a boolean result (filter entry
/// point).
pub fn eval_bool(expr: &Expr, ctx: &EvalContext) -> Result<bool, EvalError> {
    match eval(expr, ctx)? {
        Value::Boolean(b) => Ok(b),
        other => Err(EvalError::NotBoolean(other.kind())),
    }
}

fn eval_operand_bool(op: BinOp, expr: &Expr, ctx: &EvalContext) -> Result<bool, EvalError> {
    match eval(expr, ctx)? {
        Value::Boolean(b) => Ok(b),
        other => Err(EvalError::TypeError(format!(
            "'{}' requires boolean operands, got {}",
            op, other.kind()
        ))),
    }
}

fn apply_unary(op: UnaryOp, operand: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => match operand {
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            other => Err(EvalError::TypeError(format!(
                "cannot apply 'not' to {}",
                other.kind()
            ))),
        },
        UnaryOp::Neg => match operand {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(EvalError::TypeError(format!(
                "cannot negate {}",
                other.kind()
            ))),
        },
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(arith(op, *a, *b))),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (a, b) => Err(EvalError::TypeError(format!(
                "cannot add {} and {}",
                a.kind(),
                b.kind()
            ))),
        },
        BinOp::Subtract | BinOp::Multiply => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(arith(op, *a, *b))),
            (a, b) => Err(EvalError::TypeError(format!(
                "cannot apply '{}' to {} and {}",
                op,
                a.kind(),
                b.kind()
            ))),
        },
        BinOp::Divide => match (left, right) {
            (Value::Number(_), Value::Number(b)) if *b == 0.0 => Err(EvalError::DivisionByZero),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(arith(op, *a, *b))),
            (a, b) => Err(EvalError::TypeError(format!(
                "cannot divide {} by {}",
                a.kind(),
                b.kind()
            ))),
        },

        // Structural equality is defined for every kind pair; comparing
        // different kinds is false, not an error, so `path == null` works
        // on heterogeneous metadata.
        BinOp::Equal => Ok(Value::Boolean(left == right)),
        BinOp::NotEqual => Ok(Value::Boolean(left != right)),

        BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual => {
            let ordering_holds = match (left, right) {
                (Value::Number(a), Value::Number(b)) => compare(op, a.partial_cmp(b)),
                (Value::String(a), Value::String(b)) => compare(op, Some(a.cmp(b))),
                (a, b) => {
                    return Err(EvalError::TypeError(format!(
                        "cannot compare {} {} {} (ordering requires two numbers or two strings)",
                        a.kind(),
                        op,
                        b.kind()
                    )));
                }
            };
            Ok(Value::Boolean(ordering_holds))
        }

        BinOp::Matches => match (left, right) {
            (Value::String(text), Value::String(pattern)) => {
                Ok(Value::Boolean(match_anchored(pattern, pattern, text)?))
            }
            (a, b) => Err(EvalError::TypeError(format!(
                "'=~' requires string operands, got {} and {}",
                a.kind(),
                b.kind()
            ))),
        },
        BinOp::MatchesGlob => match (left, right) {
            (Value::String(text), Value::String(pattern)) => {
                let regex_src = glob::to_regex(pattern);
                Ok(Value::Boolean(match_anchored(&regex_src, pattern, text)?))
            }
            (a, b) => Err(EvalError::TypeError(format!(
                "'~' requires string operands, got {} and {}",
                a.kind(),
                b.kind()
            ))),
        },

        BinOp::In => match right {
            Value::List(items) => Ok(Value::Boolean(items.contains(left))),
            other => Err(EvalError::TypeError(format!(
                "right operand of 'in' must be a list, got {}",
                other.kind()
            ))),
        },

        BinOp::And | BinOp::Or => unreachable!("short-circuit operators handled in eval"),
    }
}

/// Decimal-mediated arithmetic: exact where both operands fit a decimal
/// (`0.1 + 0.2` is `0.3`), plain `f64` arithmetic otherwise. Division by
/// zero is rejected before this is reached.
fn arith(op: BinOp, a: f64, b: f64) -> f64 {
    if let Some(ad) = Decimal::from_f64(a)
        && let Some(bd) = Decimal::from_f64(b)
    {
        let exact = match op {
            BinOp::Add => ad.checked_add(bd),
            BinOp::Subtract => ad.checked_sub(bd),
            BinOp::Multiply => ad.checked_mul(bd),
            BinOp::Divide => ad.checked_div(bd),
            _ => None,
        };
        if let Some(result) = exact
            && let Some(r) = result.to_f64()
        {
            return r;
        }
    }
    match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        BinOp::Divide => a / b,
        _ => unreachable!("arith only receives arithmetic operators"),
    }
}

fn compare(op: BinOp, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering;
    match ordering {
        Some(Ordering::Less) => matches!(op, BinOp::LessThan | BinOp::LessEqual),
        Some(Ordering::Equal) => matches!(op, BinOp::LessEqual | BinOp::GreaterEqual),
        Some(Ordering::Greater) => matches!(op, BinOp::GreaterThan | BinOp::GreaterEqual),
        // Incomparable numbers (NaN operands) satisfy no ordering.
        None => false,
    }
}

/// Compile `pattern_src` anchored at both ends and test `text` against it.
/// Matching is whole-string; pattern compilation happens per evaluation
/// because parsed trees carry no caches.
fn match_anchored(pattern_src: &str, display: &str, text: &str) -> Result<bool, EvalError> {
    let anchored = format!("^(?:{})$", pattern_src);
    let regex = Regex::new(&anchored).map_err(|e| EvalError::InvalidPattern {
        pattern: display.to_string(),
        message: e.to_string(),
    })?;
    Ok(regex.is_match(text))
}

fn eval_call(name: &str, args: &[Expr], ctx: &EvalContext) -> Result<Value, EvalError> {
    let def =
        functions::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

    if !def.arity.accepts(args.len()) {
        return Err(EvalError::BadArity {
            name: name.to_string(),
            expected: def.arity.describe(),
            actual: args.len(),
        });
    }

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval(arg, ctx)?);
    }
    for (index, value) in values.iter().enumerate() {
        def.params.check(name, index, value)?;
    }

    Ok((def.apply)(&values))
}
