use evr_table_core::{
    ContentFragment, DescriptionCell, EvaluationResult, RowComposer, StatusKind,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const EXPECTATION_TYPES: &[&str] = &[
    "expect_column_values_to_be_null",
    "expect_column_values_to_not_be_null",
    "expect_column_kl_divergence_to_be_less_than",
    "expect_column_quantile_values_to_be_between",
    "expect_column_values_to_be_in_set",
    "expect_table_row_count_to_equal",
];

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
    ]
}

/// Payload values: well-formed, malformed, or absent.
fn field() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        scalar().prop_map(Some),
        prop::collection::vec(scalar(), 0..4).prop_map(|v| Some(Value::Array(v))),
        prop::collection::vec((scalar(), 0..10i32), 0..4).prop_map(|v| {
            Some(Value::Array(
                v.into_iter()
                    .map(|(value, count)| json!({ "value": value, "count": count }))
                    .collect(),
            ))
        }),
        Just(Some(json!({ "quantiles": [0.25, 0.5], "values": [1] }))),
        Just(Some(json!({ "observed_partition": { "values": ["a"], "weights": [1.0] } }))),
    ]
}

const FIELDS: &[&str] = &[
    "observed_value",
    "element_count",
    "unexpected_count",
    "unexpected_percent",
    "partial_unexpected_list",
    "partial_unexpected_counts",
    "details",
];

fn evaluation_result() -> impl Strategy<Value = EvaluationResult> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(EXPECTATION_TYPES),
        prop::option::of(prop::collection::vec(field(), FIELDS.len())),
    )
        .prop_map(|(success, raised, expectation_type, fields)| {
            let result = fields.map(|fields| {
                let mut map = Map::new();
                for (name, value) in FIELDS.iter().zip(fields) {
                    if let Some(value) = value {
                        map.insert(name.to_string(), value);
                    }
                }
                Value::Object(map)
            });

            EvaluationResult::from_value(json!({
                "success": success,
                "result": result,
                "exception_info": {
                    "raised_exception": raised,
                    "exception_message": "boom",
                    "exception_traceback": "Traceback..."
                },
                "expectation_config": {
                    "expectation_type": expectation_type,
                    "kwargs": { "column": "c" }
                }
            }))
            .expect("generated result is well-formed")
        })
}

proptest! {
    #[test]
    fn every_result_yields_one_row(result in evaluation_result()) {
        let rows = RowComposer::new().build_row(&result, None, true);

        prop_assert_eq!(rows.len(), 1);
        let cells = serde_json::to_value(&rows[0]).unwrap();
        prop_assert_eq!(cells.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn description_is_never_empty(result in evaluation_result()) {
        let row = RowComposer::new().build_row(&result, None, true).remove(0);

        match &row.description {
            DescriptionCell::Inline(_) => {}
            DescriptionCell::List(fragments) => prop_assert!(fragments.len() > 1),
        }
    }

    #[test]
    fn status_follows_exception_then_success(result in evaluation_result()) {
        let row = RowComposer::new().build_row(&result, None, true).remove(0);

        let expected = if result.raised_exception() {
            StatusKind::Warning
        } else if result.success {
            StatusKind::Success
        } else {
            StatusKind::Failure
        };
        prop_assert_eq!(row.status, expected.fragment());
    }

    #[test]
    fn exception_statement_is_attached(result in evaluation_result()) {
        prop_assume!(result.raised_exception());
        let row = RowComposer::new().build_row(&result, None, true).remove(0);

        let has_traceback = row
            .description
            .fragments()
            .iter()
            .any(|f| matches!(f, ContentFragment::Collapsible { .. }));
        prop_assert!(has_traceback);
    }

    #[test]
    fn rendering_is_deterministic(result in evaluation_result()) {
        let composer = RowComposer::new();
        let first = serde_json::to_string(&composer.build_row(&result, None, true)).unwrap();
        let second = serde_json::to_string(&composer.build_row(&result, None, true)).unwrap();

        prop_assert_eq!(first, second);
    }
}
