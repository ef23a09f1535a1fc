//! The built-in function table shared by both languages.
//!
//! Functions are data, not a dispatch hierarchy: each entry declares its
//! name, an arity contract, and the kind every argument must have. The
//! evaluator checks both contracts before invoking the implementation, so
//! adding a function is a table change.

use crate::evaluator::EvalError;
use crate::value::Value;

/// Number of arguments a built-in accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Arity::Exactly(n) => format!("exactly {}", n),
            Arity::AtLeast(n) => format!("at least {}", n),
        }
    }
}

/// Kind contract applied to every argument of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Any value, including null
    Any,
    /// Strings only
    String,
}

impl ParamKind {
    pub fn check(&self, function: &str, index: usize, value: &Value) -> Result<(), EvalError> {
        match self {
            ParamKind::Any => Ok(()),
            ParamKind::String => match value {
                Value::String(_) => Ok(()),
                other => Err(EvalError::BadArgument {
                    name: function.to_string(),
                    index: index + 1,
                    expected: "string",
                    actual: other.kind(),
                }),
            },
        }
    }
}

/// One entry of the function table.
pub struct FunctionDef {
    pub name: &'static str,
    pub arity: Arity,
    pub params: ParamKind,
    /// Invoked only after arity and argument kinds have been checked.
    pub apply: fn(&[Value]) -> Value,
}

/// The registered built-ins.
pub static BUILTINS: &[FunctionDef] = &[
    FunctionDef {
        name: "lower",
        arity: Arity::Exactly(1),
        params: ParamKind::String,
        apply: fn_lower,
    },
    FunctionDef {
        name: "upper",
        arity: Arity::Exactly(1),
        params: ParamKind::String,
        apply: fn_upper,
    },
    FunctionDef {
        name: "trim",
        arity: Arity::Exactly(1),
        params: ParamKind::String,
        apply: fn_trim,
    },
    FunctionDef {
        name: "concat",
        arity: Arity::AtLeast(1),
        params: ParamKind::String,
        apply: fn_concat,
    },
    FunctionDef {
        name: "coalesce",
        arity: Arity::AtLeast(1),
        params: ParamKind::Any,
        apply: fn_coalesce,
    },
    FunctionDef {
        name: "starts_with",
        arity: Arity::Exactly(2),
        params: ParamKind::String,
        apply: fn_starts_with,
    },
    FunctionDef {
        name: "ends_with",
        arity: Arity::Exactly(2),
        params: ParamKind::String,
        apply: fn_ends_with,
    },
    FunctionDef {
        name: "contains",
        arity: Arity::Exactly(2),
        params: ParamKind::String,
        apply: fn_contains,
    },
];

/// Look up a built-in by name.
pub fn lookup(name: &str) -> Option<&'static FunctionDef> {
    BUILTINS.iter().find(|def| def.name == name)
}

fn str_arg(args: &[Value], index: usize) -> &str {
    match &args[index] {
        Value::String(s) => s,
        _ => unreachable!("argument kinds are checked before apply"),
    }
}

fn fn_lower(args: &[Value]) -> Value {
    Value::String(str_arg(args, 0).to_lowercase())
}

fn fn_upper(args: &[Value]) -> Value {
    Value::String(str_arg(args, 0).to_uppercase())
}

fn fn_trim(args: &[Value]) -> Value {
    Value::String(str_arg(args, 0).trim().to_string())
}

fn fn_concat(args: &[Value]) -> Value {
    let mut out = String::new();
    for i in 0..args.len() {
        out.push_str(str_arg(args, i));
    }
    Value::String(out)
}

fn fn_coalesce(args: &[Value]) -> Value {
    args.iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

fn fn_starts_with(args: &[Value]) -> Value {
    Value::Boolean(str_arg(args, 0).starts_with(str_arg(args, 1)))
}

fn fn_ends_with(args: &[Value]) -> Value {
    Value::Boolean(str_arg(args, 0).ends_with(str_arg(args, 1)))
}

fn fn_contains(args: &[Value]) -> Value {
    Value::Boolean(str_arg(args, 0).contains(str_arg(args, 1)))
}
