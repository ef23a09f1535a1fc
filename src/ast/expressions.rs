use crate::ast::operators::{BinOp, UnaryOp};
use crate::value::Value;

/// A dotted property path identifying a location in the evaluation context.
///
/// Always holds at least one segment; `metadata.owner.name` is the path
/// with segments `["metadata", "owner", "name"]`. Paths are only used for
/// lookup, never compared or ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Build a path from its segments. The parser guarantees at least one.
    pub fn new(segments: Vec<String>) -> Self {
        Path { segments }
    }

    /// A single-segment path, used when a property definition omits its
    /// `from` clause and falls back to the attribute of the same name.
    pub fn single(segment: impl Into<String>) -> Self {
        Path {
            segments: vec![segment.into()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Abstract Syntax Tree node representing a parsed expression.
///
/// One closed variant set serves both the filter language and the
/// custom-property language; only the accepted result kind differs between
/// the two evaluator entry points. Nodes own their children exclusively and
/// are immutable after parsing, so a parsed tree can be shared across
/// threads and evaluated against many contexts.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    ///
    /// # Examples
    /// ```text
    /// 42
    /// "hello"
    /// true
    /// null
    /// ```
    Literal(Value),

    /// Reference to a context property by dotted path
    ///
    /// # Examples
    /// ```text
    /// name
    /// metadata.owner.name
    /// ```
    Path(Path),

    /// List literal
    ///
    /// Elements are arbitrary expressions; typically the right-hand side
    /// of an `in` test.
    ///
    /// # Examples
    /// ```text
    /// ["prod", "staging"]
    /// [tag, "fallback"]
    /// ```
    List(Vec<Expr>),

    /// Unary operation (`not`, unary `-`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (comparison, arithmetic, logical, matching)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call
    ///
    /// Arity and argument kinds are checked at evaluation time against the
    /// built-in function table, not at parse time.
    ///
    /// # Examples
    /// ```text
    /// lower(name)
    /// concat(lower(code), "-", region)
    /// ```
    Call { name: String, args: Vec<Expr> },

    /// Conditional expression; only the selected branch is evaluated
    ///
    /// # Example
    /// ```text
    /// if region == "eu" then "Europe" else "Other"
    /// ```
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl std::fmt::Display for Expr {
    /// Re-serialize the tree into parseable source text.
    ///
    /// Composite operands are parenthesized so that parsing the output
    /// reproduces a structurally equal tree.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Path(path) => write!(f, "{}", path),
            Expr::List(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    f.write_str("not ")?;
                    fmt_operand(operand, f)
                }
                UnaryOp::Neg => {
                    f.write_str("-")?;
                    fmt_operand(operand, f)
                }
            },
            Expr::Binary { op, left, right } => {
                fmt_operand(left, f)?;
                write!(f, " {} ", op)?;
                fmt_operand(right, f)
            }
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                f.write_str("if ")?;
                fmt_operand(condition, f)?;
                f.write_str(" then ")?;
                fmt_operand(then_branch, f)?;
                f.write_str(" else ")?;
                fmt_operand(else_branch, f)
            }
        }
    }
}

/// Print a child expression, wrapped in parentheses when it is itself a
/// compound form whose precedence could be misread in context.
fn fmt_operand(expr: &Expr, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match expr {
        Expr::Binary { .. } | Expr::Unary { .. } | Expr::If { .. } => {
            write!(f, "({})", expr)
        }
        _ => write!(f, "{}", expr),
    }
}
