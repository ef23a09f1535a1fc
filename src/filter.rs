use crate::ast::Expr;
use crate::context::EvalContext;
use crate::evaluator::{self, EvalError};
use crate::lexer::Lexer;
use crate::parser::{ParseError, Parser};
use crate::value::Value;

/// A compiled item filter.
///
/// The scan engine compiles the configured filter source once, then calls
/// [`Filter::matches`] for every discovered item with that item's context.
/// A `Filter` is immutable and safe to share across scanning threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sift_lang::{EvalContext, Filter};
///
/// let filter = Filter::parse("type == 'dataset' and name ~ 'sales_*'").unwrap();
/// let ctx = EvalContext::new(json!({"type": "dataset", "name": "sales_2024"}));
/// assert!(filter.matches(&ctx).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    expr: Expr,
}

impl Filter {
    /// Compile a filter specification. An empty or blank source keeps
    /// every item.
    pub fn parse(source: &str) -> Result<Filter, ParseError> {
        if source.trim().is_empty() {
            return Ok(Filter::always());
        }
        let lexer = Lexer::new(source);
        let mut parser = Parser::new(lexer)?;
        let expr = parser.parse()?;
        Ok(Filter { expr })
    }

    /// The filter that keeps every item.
    pub fn always() -> Filter {
        Filter {
            expr: Expr::Literal(Value::Boolean(true)),
        }
    }

    /// The filter that discards every item.
    pub fn never() -> Filter {
        Filter {
            expr: Expr::Literal(Value::Boolean(false)),
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Decide whether the item described by `ctx` is kept.
    ///
    /// The expression must produce a boolean; any other final kind is an
    /// evaluation error. Errors fail only this one item's evaluation.
    pub fn matches(&self, ctx: &EvalContext) -> Result<bool, EvalError> {
        evaluator::eval_bool(&self.expr, ctx)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expr)
    }
}
