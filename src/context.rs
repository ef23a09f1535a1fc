use crate::ast::Path;
use crate::value::Value;

/// Read-only view over one discovered item's raw attributes.
///
/// The scan engine supplies each item's attributes as a nested JSON tree
/// (string keys; string/number/boolean/null/list/map values). A context is
/// built per item, used for one evaluation, and discarded; it performs no
/// caching and no mutation.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sift_lang::{EvalContext, Value};
/// use sift_lang::ast::Path;
///
/// let ctx = EvalContext::new(json!({"metadata": {"owner": "data-team"}}));
/// let path = Path::new(vec!["metadata".into(), "owner".into()]);
/// assert_eq!(ctx.resolve(&path), Value::String("data-team".into()));
/// ```
#[derive(Debug, Clone)]
pub struct EvalContext {
    root: serde_json::Value,
}

impl EvalContext {
    pub fn new(root: serde_json::Value) -> Self {
        EvalContext { root }
    }

    /// A context with no attributes; every path resolves to `Null`.
    pub fn empty() -> Self {
        EvalContext {
            root: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Resolve a dotted path to a value. Total: an absent key at any
    /// depth, or a further segment applied to a non-map value, yields
    /// `Value::Null` rather than an error, so filters can test for absent
    /// optional metadata with `path == null`.
    pub fn resolve(&self, path: &Path) -> Value {
        let mut current = &self.root;
        for segment in path.segments() {
            match current {
                serde_json::Value::Object(map) => match map.get(segment) {
                    Some(child) => current = child,
                    None => return Value::Null,
                },
                _ => return Value::Null,
            }
        }
        Value::from_json(current)
    }
}

impl From<serde_json::Value> for EvalContext {
    fn from(root: serde_json::Value) -> Self {
        EvalContext::new(root)
    }
}
