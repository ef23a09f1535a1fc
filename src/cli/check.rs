//! Evaluate filter and property sources against a JSON item

use super::CliError;
use crate::{CustomProperties, EvalContext, Filter};

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// The filter source to evaluate
    pub source: String,
    /// JSON item input string
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Options for the property command
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    /// The property definition list to evaluate
    pub source: String,
    /// JSON item input string
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Evaluation succeeded with JSON output
    Success(serde_json::Value),
}

/// Compile a filter and run it against the JSON item.
pub fn check_filter(options: &FilterOptions) -> Result<CheckResult, CliError> {
    let filter = Filter::parse(&options.source).map_err(CliError::Parse)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let ctx = parse_input(options.input.as_deref())?;
    let kept = filter.matches(&ctx).map_err(CliError::Eval)?;

    Ok(CheckResult::Success(serde_json::Value::Bool(kept)))
}

/// Parse a property definition list and derive every property from the
/// JSON item. The output is an object mapping property codes to values.
pub fn check_properties(options: &PropertyOptions) -> Result<CheckResult, CliError> {
    let properties = CustomProperties::parse(&options.source).map_err(CliError::Parse)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let ctx = parse_input(options.input.as_deref())?;
    let values = properties.evaluate(&ctx).map_err(CliError::Eval)?;

    let mut object = serde_json::Map::new();
    for (code, value) in values {
        object.insert(code.to_string(), value.to_json());
    }
    Ok(CheckResult::Success(serde_json::Value::Object(object)))
}

fn parse_input(input: Option<&str>) -> Result<EvalContext, CliError> {
    let json_str = input.ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str).map_err(CliError::Json)?;
    Ok(EvalContext::new(json))
}
