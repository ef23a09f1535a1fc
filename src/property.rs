//! Custom-property definitions: typed metadata values derived from an
//! item's raw source attributes.
//!
//! A connection configures a list of definitions, each declaring the
//! catalog property type, the property code, and the expression deriving
//! its value:
//!
//! ```text
//! string 'display name' from concat(upper(code), " (", region, ")")
//! tag environment
//! number size_kb from stats.bytes / 1024
//! ```
//!
//! Omitting `from` derives the property from the attribute with the same
//! name as the code.

use crate::ast::Expr;
use crate::context::EvalContext;
use crate::evaluator::{self, EvalError};
use crate::lexer::Lexer;
use crate::parser::{ParseError, Parser};
use crate::value::Value;

/// The catalog property type a definition declares.
///
/// The type describes the property definition registered with the catalog;
/// it does not coerce the derived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    LongText,
    Tag,
    Number,
    Url,
    Instant,
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyType::String => "string",
            PropertyType::LongText => "long text",
            PropertyType::Tag => "tag",
            PropertyType::Number => "number",
            PropertyType::Url => "url",
            PropertyType::Instant => "instant",
        };
        f.write_str(name)
    }
}

/// One custom-property definition: type, code, and source expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomProperty {
    property_type: PropertyType,
    code: String,
    source: Expr,
}

impl CustomProperty {
    pub fn new(property_type: PropertyType, code: impl Into<String>, source: Expr) -> Self {
        CustomProperty {
            property_type,
            code: code.into(),
            source,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn source(&self) -> &Expr {
        &self.source
    }

    /// Derive this property's value from one item's context.
    pub fn evaluate(&self, ctx: &EvalContext) -> Result<Value, EvalError> {
        evaluator::eval(&self.source, ctx)
    }
}

/// A parsed custom-property definition list.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sift_lang::{CustomProperties, EvalContext, Value};
///
/// let props = CustomProperties::parse("tag env from metadata.environment").unwrap();
/// let ctx = EvalContext::new(json!({"metadata": {"environment": "prod"}}));
/// let values = props.evaluate(&ctx).unwrap();
/// assert_eq!(values, vec![("env", Value::String("prod".into()))]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CustomProperties {
    properties: Vec<CustomProperty>,
}

impl CustomProperties {
    /// No properties; deriving values yields an empty list.
    pub fn empty() -> Self {
        CustomProperties { properties: vec![] }
    }

    /// Parse a definition list. An empty or blank source is the empty
    /// list, not an error.
    pub fn parse(definitions: &str) -> Result<Self, ParseError> {
        if definitions.trim().is_empty() {
            return Ok(CustomProperties::empty());
        }
        let lexer = Lexer::new(definitions);
        let mut parser = Parser::new(lexer)?;
        let properties = parser.parse_property_definitions()?;
        Ok(CustomProperties { properties })
    }

    pub fn properties(&self) -> &[CustomProperty] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomProperty> {
        self.properties.iter()
    }

    /// Derive every property for one item, in definition order.
    ///
    /// The first failing definition fails the whole item derivation; other
    /// items are unaffected.
    pub fn evaluate(&self, ctx: &EvalContext) -> Result<Vec<(&str, Value)>, EvalError> {
        let mut values = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            values.push((property.code(), property.evaluate(ctx)?));
        }
        Ok(values)
    }
}
