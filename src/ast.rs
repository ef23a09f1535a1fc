//! # Abstract syntax shared by the filter and custom-property languages
//!
//! Both languages parse into the same expression tree; they differ only in
//! the result kind their evaluator entry point accepts (boolean for
//! filters, any value for custom properties).
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, with positions
//! - **[expressions]** - Expression nodes (literals, paths, operations,
//!   calls, conditionals) and dotted paths
//! - **[operators]** - Binary and unary operators
//!
//! ## Core Concepts
//!
//! ### One grammar, two result contracts
//!
//! A filter source like
//!
//! ```text
//! type == "dataset" and not (name =~ "tmp_.*")
//! ```
//!
//! and a custom-property source like
//!
//! ```text
//! concat(lower(code), "-", coalesce(region, "eu"))
//! ```
//!
//! share the whole token/expression vocabulary. The filter evaluator just
//! additionally requires the final value to be a boolean.
//!
//! ### Immutability
//!
//! A parsed [`Expr`] owns its children, carries no evaluation state, and
//! is never mutated after parsing; one compiled tree may be evaluated
//! concurrently against many per-item contexts.

pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, Path};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Position, Token, TokenKind};
