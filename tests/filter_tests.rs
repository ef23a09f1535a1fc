// tests/filter_tests.rs

use serde_json::json;
use sift_lang::evaluator::EvalError;
use sift_lang::{EvalContext, Filter};

fn matches(source: &str, item: serde_json::Value) -> Result<bool, EvalError> {
    let filter = Filter::parse(source).expect("filter should parse");
    filter.matches(&EvalContext::new(item))
}

// ============================================================================
// Basic matching
// ============================================================================

#[test]
fn test_equality_on_context_value() {
    assert_eq!(matches("type == 'dataset'", json!({"type": "dataset"})), Ok(true));
    assert_eq!(matches("type == 'dataset'", json!({"type": "report"})), Ok(false));
}

#[test]
fn test_nested_path_lookup() {
    let item = json!({"metadata": {"owner": {"name": "data-team"}}});
    assert_eq!(matches("metadata.owner.name == 'data-team'", item), Ok(true));
}

#[test]
fn test_numeric_comparison() {
    assert_eq!(matches("size > 100", json!({"size": 250})), Ok(true));
    assert_eq!(matches("size > 100", json!({"size": 50})), Ok(false));
}

#[test]
fn test_string_ordering_is_lexicographic() {
    assert_eq!(matches("'abc' < 'abd'", json!({})), Ok(true));
    assert_eq!(matches("name >= 'm'", json!({"name": "orders"})), Ok(true));
}

#[test]
fn test_not() {
    assert_eq!(matches("not (type == 'report')", json!({"type": "dataset"})), Ok(true));
}

// ============================================================================
// Missing data propagates as null, never an error
// ============================================================================

#[test]
fn test_absent_path_is_null() {
    assert_eq!(matches("a.b.c == null", json!({})), Ok(true));
    assert_eq!(matches("a.b.c != null", json!({})), Ok(false));
}

#[test]
fn test_segment_through_scalar_is_null() {
    // `a` is a string, so `a.b` has nowhere to go and degrades to null.
    assert_eq!(matches("a.b == null", json!({"a": "scalar"})), Ok(true));
}

#[test]
fn test_cross_kind_equality_is_false_not_an_error() {
    assert_eq!(matches("tag == 3", json!({"tag": "x"})), Ok(false));
    assert_eq!(matches("tag != 3", json!({"tag": "x"})), Ok(true));
}

// ============================================================================
// Short-circuit evaluation
// ============================================================================

#[test]
fn test_and_short_circuits_on_false() {
    // The right operand would raise division-by-zero if evaluated.
    assert_eq!(matches("false and (1/0 == 0)", json!({})), Ok(false));
}

#[test]
fn test_or_short_circuits_on_true() {
    assert_eq!(matches("true or (1/0 == 0)", json!({})), Ok(true));
}

#[test]
fn test_and_still_evaluates_right_when_needed() {
    assert!(matches("true and (1/0 == 0)", json!({})).is_err());
}

#[test]
fn test_and_requires_boolean_operands() {
    let err = matches("1 and true", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

// ============================================================================
// Type errors
// ============================================================================

#[test]
fn test_ordering_between_mixed_kinds_is_an_error() {
    let err = matches("'x' > 3", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_adding_number_and_boolean_is_an_error() {
    let err = matches("1 + true == 2", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_division_by_zero() {
    let err = matches("1 / 0 == 0", json!({})).unwrap_err();
    assert_eq!(err, EvalError::DivisionByZero);
}

#[test]
fn test_not_requires_boolean() {
    let err = matches("not 'x'", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_filter_result_must_be_boolean() {
    let err = matches("1 + 1", json!({})).unwrap_err();
    assert_eq!(err, EvalError::NotBoolean("number"));
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_in_membership() {
    let item = json!({"tag": "prod"});
    assert_eq!(matches("tag in ['prod', 'staging']", item.clone()), Ok(true));
    assert_eq!(matches("tag in ['dev']", item), Ok(false));
}

#[test]
fn test_in_against_context_list() {
    let item = json!({"tags": ["pii", "finance"]});
    assert_eq!(matches("'pii' in tags", item), Ok(true));
}

#[test]
fn test_not_in() {
    assert_eq!(matches("tag not in ['dev']", json!({"tag": "prod"})), Ok(true));
}

#[test]
fn test_in_requires_a_list_on_the_right() {
    let err = matches("'a' in 'abc'", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_null_membership() {
    assert_eq!(matches("missing in [null]", json!({})), Ok(true));
}

// ============================================================================
// Regex and glob matching
// ============================================================================

#[test]
fn test_regex_match() {
    let item = json!({"name": "tmp_scratch"});
    assert_eq!(matches("name =~ 'tmp_.*'", item), Ok(true));
}

#[test]
fn test_regex_match_is_anchored() {
    // Whole-string semantics: a partial hit is not a match.
    assert_eq!(matches("'ab' =~ 'a'", json!({})), Ok(false));
    assert_eq!(matches("'ab' =~ 'a.'", json!({})), Ok(true));
}

#[test]
fn test_invalid_regex_is_an_eval_error() {
    let err = matches("'x' =~ '('", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::InvalidPattern { .. }));
}

#[test]
fn test_regex_requires_string_operands() {
    let err = matches("3 =~ '3'", json!({})).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_glob_match() {
    let item = json!({"name": "sales_2024"});
    assert_eq!(matches("name ~ 'sales_*'", item.clone()), Ok(true));
    assert_eq!(matches("name ~ 'inventory_*'", item), Ok(false));
}

#[test]
fn test_glob_is_anchored() {
    assert_eq!(matches("'sales_2024' ~ 'sales'", json!({})), Ok(false));
}

#[test]
fn test_glob_question_mark() {
    assert_eq!(matches("'a1c' ~ 'a?c'", json!({})), Ok(true));
    assert_eq!(matches("'abbc' ~ 'a?c'", json!({})), Ok(false));
}

#[test]
fn test_glob_escapes_regex_metacharacters() {
    assert_eq!(matches("'a.b' ~ 'a.b'", json!({})), Ok(true));
    assert_eq!(matches("'axb' ~ 'a.b'", json!({})), Ok(false));
}

// ============================================================================
// Compilation
// ============================================================================

#[test]
fn test_empty_source_keeps_every_item() {
    let filter = Filter::parse("").unwrap();
    assert_eq!(filter, Filter::always());
    assert_eq!(filter.matches(&EvalContext::empty()), Ok(true));

    let blank = Filter::parse("   \n\t ").unwrap();
    assert_eq!(blank, Filter::always());
}

#[test]
fn test_never_discards_every_item() {
    assert_eq!(Filter::never().matches(&EvalContext::empty()), Ok(false));
}

#[test]
fn test_parse_error_carries_position() {
    let err = Filter::parse("type == ").unwrap_err();
    assert_eq!(err.found, "end of input");
    assert_eq!(err.position.offset, 8);
}

#[test]
fn test_eval_error_does_not_poison_the_filter() {
    // An evaluation failure is per-item; the same compiled filter keeps
    // working for the next item.
    let filter = Filter::parse("size > 100").unwrap();

    let bad = EvalContext::new(json!({"size": "not a number"}));
    assert!(filter.matches(&bad).is_err());

    let good = EvalContext::new(json!({"size": 500}));
    assert_eq!(filter.matches(&good), Ok(true));
}

#[test]
fn test_conditional_in_filter() {
    let item = json!({"env": "prod", "size": 10});
    assert_eq!(
        matches("if env == 'prod' then size < 100 else true", item),
        Ok(true)
    );
}
