// tests/integration_tests.rs

use serde_json::json;
use sift_lang::output::{to_json, to_json_pretty};
use sift_lang::{CustomProperties, EvalContext, Filter, Value};

// ============================================================================
// A scan-shaped scenario: one compiled filter and property list, many items
// ============================================================================

#[test]
fn test_scan_keeps_and_enriches_matching_items() {
    let filter = Filter::parse(
        "type == 'dataset' and metadata.environment in ['prod', 'staging'] \
         and not (name =~ 'tmp_.*')",
    )
    .unwrap();

    let properties = CustomProperties::parse(
        "string label from concat(lower(name), '@', metadata.environment)\n\
         number size_kb from stats.bytes / 1024\n\
         string owner from coalesce(metadata.owner, 'unassigned')",
    )
    .unwrap();

    let items = [
        json!({
            "type": "dataset",
            "name": "Orders",
            "metadata": {"environment": "prod", "owner": "data-team"},
            "stats": {"bytes": 4096},
        }),
        json!({
            "type": "dataset",
            "name": "tmp_scratch",
            "metadata": {"environment": "prod"},
            "stats": {"bytes": 1},
        }),
        json!({
            "type": "report",
            "name": "Weekly",
            "metadata": {"environment": "prod"},
        }),
        json!({
            "type": "dataset",
            "name": "Inventory",
            "metadata": {"environment": "staging"},
            "stats": {"bytes": 2048},
        }),
    ];

    let mut kept = Vec::new();
    for item in items {
        let ctx = EvalContext::new(item);
        if filter.matches(&ctx).unwrap() {
            kept.push(properties.evaluate(&ctx).unwrap());
        }
    }

    assert_eq!(kept.len(), 2);
    assert_eq!(
        kept[0],
        vec![
            ("label", Value::String("orders@prod".into())),
            ("size_kb", Value::Number(4.0)),
            ("owner", Value::String("data-team".into())),
        ]
    );
    assert_eq!(
        kept[1],
        vec![
            ("label", Value::String("inventory@staging".into())),
            ("size_kb", Value::Number(2.0)),
            ("owner", Value::String("unassigned".into())),
        ]
    );
}

#[test]
fn test_compiled_filter_is_shareable_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let filter = Arc::new(Filter::parse("size > 100").unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                let ctx = EvalContext::new(json!({"size": i * 100}));
                filter.matches(&ctx).unwrap()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, true, true]);
}

// ============================================================================
// Context conversion edges
// ============================================================================

#[test]
fn test_object_leaf_degrades_to_null() {
    // A path that stops on a map has no value representation.
    let filter = Filter::parse("metadata == null").unwrap();
    let ctx = EvalContext::new(json!({"metadata": {"owner": "x"}}));
    assert_eq!(filter.matches(&ctx), Ok(true));
}

#[test]
fn test_list_attribute_converts_elementwise() {
    let filter = Filter::parse("'pii' in tags and 'open' not in tags").unwrap();
    let ctx = EvalContext::new(json!({"tags": ["pii", "finance"]}));
    assert_eq!(filter.matches(&ctx), Ok(true));
}

#[test]
fn test_non_object_root_resolves_to_null() {
    let filter = Filter::parse("anything == null").unwrap();
    let ctx = EvalContext::new(json!(42));
    assert_eq!(filter.matches(&ctx), Ok(true));
}

// ============================================================================
// Output rendering
// ============================================================================

#[test]
fn test_to_json_scalars() {
    assert_eq!(to_json(&Value::Null), "null");
    assert_eq!(to_json(&Value::Boolean(true)), "true");
    assert_eq!(to_json(&Value::String("a\"b".into())), "\"a\\\"b\"");
}

#[test]
fn test_to_json_renders_whole_numbers_without_fraction() {
    assert_eq!(to_json(&Value::Number(3.0)), "3");
    assert_eq!(to_json(&Value::Number(2.5)), "2.5");
}

#[test]
fn test_to_json_list() {
    let value = Value::List(vec![Value::Number(1.0), Value::String("x".into())]);
    assert_eq!(to_json(&value), "[1,\"x\"]");
    assert_eq!(to_json_pretty(&value), "[\n  1,\n  \"x\"\n]");
}

#[test]
fn test_empty_list_rendering() {
    assert_eq!(to_json(&Value::List(vec![])), "[]");
    assert_eq!(to_json_pretty(&Value::List(vec![])), "[]");
}

// ============================================================================
// CLI entry points
// ============================================================================

#[test]
fn test_cli_check_filter() {
    use sift_lang::cli::{check_filter, CheckResult, FilterOptions};

    let options = FilterOptions {
        source: "type == 'dataset'".to_string(),
        input: Some(r#"{"type": "dataset"}"#.to_string()),
        syntax_only: false,
    };

    match check_filter(&options).unwrap() {
        CheckResult::Success(output) => assert_eq!(output, serde_json::Value::Bool(true)),
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_cli_check_filter_syntax_only_needs_no_input() {
    use sift_lang::cli::{check_filter, CheckResult, FilterOptions};

    let options = FilterOptions {
        source: "a == 1".to_string(),
        input: None,
        syntax_only: true,
    };

    assert!(matches!(
        check_filter(&options).unwrap(),
        CheckResult::SyntaxValid
    ));
}

#[test]
fn test_cli_check_properties() {
    use sift_lang::cli::{check_properties, CheckResult, PropertyOptions};

    let options = PropertyOptions {
        source: "tag env from metadata.environment".to_string(),
        input: Some(r#"{"metadata": {"environment": "prod"}}"#.to_string()),
        syntax_only: false,
    };

    match check_properties(&options).unwrap() {
        CheckResult::Success(output) => {
            assert_eq!(output, json!({"env": "prod"}));
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_cli_missing_input_is_an_error() {
    use sift_lang::cli::{check_filter, CliError, FilterOptions};

    let options = FilterOptions {
        source: "a == 1".to_string(),
        input: None,
        syntax_only: false,
    };

    assert!(matches!(check_filter(&options), Err(CliError::NoInput)));
}
