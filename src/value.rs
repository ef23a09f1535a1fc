use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// A runtime value in the filter and custom-property languages.
///
/// This is the only value type either language produces. The filter
/// language additionally requires its final result to be [`Value::Boolean`].
/// Numbers are double-precision; there is no separate integer kind.
///
/// # Examples
///
/// ```
/// use sift_lang::Value;
///
/// let null = Value::Null;
/// let flag = Value::Boolean(true);
/// let count = Value::Number(42.0);
/// let name = Value::String("orders".to_string());
/// let tags = Value::List(vec![Value::String("prod".into())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicitly null data
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Double-precision number
    Number(f64),

    /// UTF-8 string
    String(String),

    /// List of values (homogeneous or heterogeneous)
    List(Vec<Value>),
}

impl Value {
    /// Human-readable kind name, used in evaluation error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean, if the value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number, if the value is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice, if the value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON tree node into a language value.
    ///
    /// JSON objects have no counterpart in the closed value set and map to
    /// `Null`, the same degradation as an absent path; the context resolves
    /// intermediate objects itself and only leaves reach this conversion.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => Value::List(arr.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(_) => Value::Null,
        }
    }

    /// Convert a language value into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl std::fmt::Display for Value {
    /// Literal syntax: the output is valid source text for the grammar
    /// (and valid JSON, except that control characters other than
    /// `\n`/`\r`/`\t` are emitted raw).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Render a number without floating-point artifacts: `3.0` prints as `3`,
/// `0.30000000000000004` as `0.3`. Falls back to the plain `f64` rendering
/// when the value does not fit a decimal.
pub(crate) fn format_number(n: f64) -> String {
    match Decimal::from_f64(n) {
        Some(d) => d.normalize().to_string(),
        None => n.to_string(),
    }
}

/// Escape a string for quoting: only the escapes the lexer understands.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
