//! Text rendering of language values.
//!
//! Used by the CLI and by tests to show derived values. Output is valid
//! JSON for every value kind (numbers render decimal-clean, so `3.0`
//! prints as `3`).
//!
//! # Examples
//!
//! ```
//! use sift_lang::Value;
//! use sift_lang::output::{to_json, to_json_pretty};
//!
//! let value = Value::List(vec![Value::Number(1.0), Value::Number(2.5)]);
//!
//! assert_eq!(to_json(&value), "[1,2.5]");
//! assert_eq!(to_json_pretty(&value), "[\n  1,\n  2.5\n]");
//! ```

use crate::value::{self, Value};

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => value::format_number(*n),
            Value::String(s) => format!("\"{}\"", value::escape_string(s)),
            Value::List(items) => self.print_list(items, indent),
        }
    }

    fn print_list(&self, items: &[Value], indent: usize) -> String {
        if items.is_empty() {
            return "[]".to_string();
        }

        if self.pretty {
            let mut result = "[\n".to_string();
            let lines: Vec<String> = items
                .iter()
                .map(|v| {
                    format!(
                        "{}{}",
                        self.indent(indent + 1),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&lines.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push(']');
            result
        } else {
            let parts: Vec<String> = items.iter().map(|v| self.print_value(v, indent)).collect();
            format!("[{}]", parts.join(","))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Render a value as compact JSON.
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Render a value as pretty JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
