//! Unexpected-value evidence.
//!
//! Two independent builders: a narrative statement (counts, or the raised
//! exception) and a table of sampled unexpected values. Each returns its own
//! `Result` so the row composer can drop one without losing the other.

use serde_json::Value;

use crate::content::{ContentFragment, ElementStyling, StringTemplate, Styling, TableCell};
use crate::format::NumberFormatter;
use crate::result::EvaluationResult;
use crate::values::{is_truthy, require_json_number, require_number};
use crate::RenderError;

const EXCEPTION_TEMPLATE: &str = "\n\n$expectation_type raised an exception:\n$exception_message";
const UNEXPECTED_TEMPLATE: &str =
    "\n\n$unexpected_count unexpected values found. $unexpected_percent of $element_count total rows.";
const TRACEBACK_TOGGLE: &str = "Show exception traceback...";

/// Integer counts are printed exactly.
const COUNT_PRECISION: usize = 20;
const PERCENT_PRECISION: usize = 4;

/// Build the statement fragments describing why the expectation failed.
///
/// # Returns
///
/// * two fragments (message, collapsible traceback) when an exception was raised
/// * one fragment with counts when unexpected values were found
/// * nothing when the expectation succeeded or found no unexpected values
pub fn build_unexpected_statement(
    result: &EvaluationResult,
    formatter: &dyn NumberFormatter,
) -> Result<Vec<ContentFragment>, RenderError> {
    if result.raised_exception() {
        return Ok(exception_statement(result));
    }

    let has_unexpected = result
        .result_field("unexpected_count")
        .is_some_and(is_truthy);
    if result.success || !has_unexpected {
        return Ok(Vec::new());
    }

    let Some(payload) = result.result.as_ref() else {
        return Ok(Vec::new());
    };

    let unexpected_count = formatter.format_json(
        require_json_number(payload, "unexpected_count")?,
        COUNT_PRECISION,
        true,
    );
    let unexpected_percent = format!(
        "{}%",
        formatter.format(
            require_number(payload, "unexpected_percent")?,
            PERCENT_PRECISION,
            false
        )
    );
    let element_count = formatter.format_json(
        require_json_number(payload, "element_count")?,
        COUNT_PRECISION,
        true,
    );

    let template = StringTemplate::new(UNEXPECTED_TEMPLATE)
        .with_param("unexpected_count", unexpected_count)
        .with_param("unexpected_percent", unexpected_percent)
        .with_param("element_count", element_count)
        .with_tag("strong")
        .with_styling(Styling::new().with_classes(&["text-danger"]));

    Ok(vec![ContentFragment::template(template)])
}

fn exception_statement(result: &EvaluationResult) -> Vec<ContentFragment> {
    let info = &result.exception_info;

    let message = StringTemplate::new(EXCEPTION_TEMPLATE)
        .with_param("expectation_type", result.expectation_type())
        .with_param(
            "exception_message",
            info.exception_message.clone().map_or(Value::Null, Value::String),
        )
        .with_tag("strong")
        .with_styling(
            Styling::new()
                .with_classes(&["text-danger"])
                .with_param("exception_message", ElementStyling::tag("code"))
                .with_param(
                    "expectation_type",
                    ElementStyling::classes(&["badge", "badge-danger", "mb-2"]),
                ),
        );

    let traceback = StringTemplate::new(info.exception_traceback.clone().unwrap_or_default())
        .with_tag("code");

    vec![
        ContentFragment::template(message),
        ContentFragment::collapsible(TRACEBACK_TOGGLE, vec![ContentFragment::template(traceback)]),
    ]
}

/// Build a table of sampled unexpected values.
///
/// Prefers `partial_unexpected_counts` (value + count) over
/// `partial_unexpected_list` (value only). Empty strings display as
/// `EMPTY` and null/missing values as `null`; other falsy values such as
/// `0` or `false` are shown as they are.
pub fn build_unexpected_table(
    result: &EvaluationResult,
) -> Result<Option<ContentFragment>, RenderError> {
    let Some(payload) = result.result.as_ref() else {
        return Ok(None);
    };

    let counts = payload
        .get("partial_unexpected_counts")
        .filter(|v| is_truthy(v));
    let list = payload
        .get("partial_unexpected_list")
        .filter(|v| is_truthy(v));

    let (header_row, rows): (&[&str], Vec<Vec<TableCell>>) = match (counts, list) {
        (Some(counts), _) => {
            let entries = counts
                .as_array()
                .ok_or_else(|| RenderError::invalid("partial_unexpected_counts", "array"))?;
            let mut rows = Vec::with_capacity(entries.len());
            for entry in entries {
                let entry = entry.as_object().ok_or_else(|| {
                    RenderError::invalid("partial_unexpected_counts", "array of objects")
                })?;
                let count = entry.get("count").cloned().unwrap_or(Value::Null);
                rows.push(vec![display_unexpected(entry.get("value")), count.into()]);
            }
            (&["Unexpected Value", "Count"][..], rows)
        }
        (None, Some(list)) => {
            let entries = list
                .as_array()
                .ok_or_else(|| RenderError::invalid("partial_unexpected_list", "array"))?;
            let rows = entries
                .iter()
                .map(|value| vec![display_unexpected(Some(value))])
                .collect();
            (&["Unexpected Value"][..], rows)
        }
        (None, None) => return Ok(None),
    };

    let table = ContentFragment::table(header_row, rows).with_styling(
        Styling::new().with_body(ElementStyling::classes(&["table-bordered", "table-sm", "mt-3"])),
    );

    Ok(Some(table))
}

/// Three-way display rule: value as-is, `""` → `EMPTY`, null/missing → `null`.
fn display_unexpected(value: Option<&Value>) -> TableCell {
    match value {
        None | Some(Value::Null) => "null".into(),
        Some(Value::String(s)) if s.is_empty() => "EMPTY".into(),
        Some(value) => value.clone().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DecimalFormatter;
    use serde_json::json;

    fn evr(value: Value) -> EvaluationResult {
        EvaluationResult::from_value(value).unwrap()
    }

    fn failing(result: Value) -> EvaluationResult {
        evr(json!({
            "success": false,
            "result": result,
            "expectation_config": {
                "expectation_type": "expect_column_values_to_be_in_set",
                "kwargs": { "column": "c" }
            }
        }))
    }

    fn rows(fragment: &ContentFragment) -> (Vec<String>, Vec<Vec<TableCell>>) {
        let (header, body) = fragment.as_table().unwrap();
        (header.to_vec(), body.to_vec())
    }

    #[test]
    fn test_counts_statement() {
        let result = failing(json!({
            "element_count": 12345,
            "unexpected_count": 1234,
            "unexpected_percent": 9.99595
        }));

        let statement = build_unexpected_statement(&result, &DecimalFormatter::new()).unwrap();
        assert_eq!(statement.len(), 1);

        let template = statement[0].as_string_template().unwrap();
        assert_eq!(template.params["unexpected_count"], json!("1,234"));
        assert_eq!(template.params["unexpected_percent"], json!("≈9.996%"));
        assert_eq!(template.params["element_count"], json!("12,345"));
        assert_eq!(template.tag.as_deref(), Some("strong"));
        assert!(template.styling.as_ref().unwrap().has_class("text-danger"));
    }

    #[test]
    fn test_counts_beyond_f64_precision_are_exact() {
        let result = failing(json!({
            "element_count": 18014398509481987_u64,
            "unexpected_count": 9007199254740993_u64,
            "unexpected_percent": 50
        }));

        let statement = build_unexpected_statement(&result, &DecimalFormatter::new()).unwrap();
        assert_eq!(
            statement[0].to_plain_text(),
            "\n\n9,007,199,254,740,993 unexpected values found. \
             50% of 18,014,398,509,481,987 total rows."
        );
    }

    #[test]
    fn test_no_statement_for_success_or_zero_count() {
        let formatter = DecimalFormatter::new();

        let mut success = failing(json!({ "unexpected_count": 3 }));
        success.success = true;
        assert!(build_unexpected_statement(&success, &formatter).unwrap().is_empty());

        let zero = failing(json!({ "unexpected_count": 0 }));
        assert!(build_unexpected_statement(&zero, &formatter).unwrap().is_empty());

        let missing = failing(json!({}));
        assert!(build_unexpected_statement(&missing, &formatter).unwrap().is_empty());
    }

    #[test]
    fn test_statement_missing_percent_is_error() {
        let result = failing(json!({ "unexpected_count": 3, "element_count": 10 }));
        let err = build_unexpected_statement(&result, &DecimalFormatter::new()).unwrap_err();
        assert_eq!(err, RenderError::MissingField("unexpected_percent".to_string()));
    }

    #[test]
    fn test_exception_statement() {
        let result = failing(json!({})).with_exception("division by zero", "Traceback: line 1");

        let statement = build_unexpected_statement(&result, &DecimalFormatter::new()).unwrap();
        assert_eq!(statement.len(), 2);

        let message = statement[0].as_string_template().unwrap();
        assert_eq!(
            message.params["expectation_type"],
            json!("expect_column_values_to_be_in_set")
        );
        assert_eq!(message.params["exception_message"], json!("division by zero"));

        match &statement[1] {
            ContentFragment::Collapsible {
                collapse_toggle_link,
                collapse,
                ..
            } => {
                assert_eq!(collapse_toggle_link, "Show exception traceback...");
                assert_eq!(collapse[0].to_plain_text(), "Traceback: line 1");
            }
            other => panic!("expected collapsible, got {:?}", other),
        }
    }

    #[test]
    fn test_counts_table() {
        let result = failing(json!({
            "partial_unexpected_counts": [
                { "value": "", "count": 5 },
                { "value": null, "count": 2 },
                { "value": "x", "count": 1 }
            ]
        }));

        let table = build_unexpected_table(&result).unwrap().unwrap();
        let (header, body) = rows(&table);

        let expected: Vec<Vec<TableCell>> = vec![
            vec!["EMPTY".into(), json!(5).into()],
            vec!["null".into(), json!(2).into()],
            vec!["x".into(), json!(1).into()],
        ];
        assert_eq!(header, vec!["Unexpected Value", "Count"]);
        assert_eq!(body, expected);
        let body_styling = table.styling().and_then(|s| s.body.as_ref()).unwrap();
        assert!(body_styling.classes.contains(&"table-bordered".to_string()));
    }

    #[test]
    fn test_list_table_keeps_falsy_values() {
        let result = failing(json!({ "partial_unexpected_list": [0, "", null, "y", false] }));

        let table = build_unexpected_table(&result).unwrap().unwrap();
        let (header, body) = rows(&table);

        let expected: Vec<Vec<TableCell>> = vec![
            vec![json!(0).into()],
            vec!["EMPTY".into()],
            vec!["null".into()],
            vec!["y".into()],
            vec![json!(false).into()],
        ];
        assert_eq!(header, vec!["Unexpected Value"]);
        assert_eq!(body, expected);
    }

    #[test]
    fn test_counts_take_precedence_over_list() {
        let result = failing(json!({
            "partial_unexpected_list": ["a"],
            "partial_unexpected_counts": [{ "value": "a", "count": 1 }]
        }));
        let table = build_unexpected_table(&result).unwrap().unwrap();
        assert_eq!(rows(&table).0.len(), 2);
    }

    #[test]
    fn test_no_table_without_samples() {
        assert!(build_unexpected_table(&failing(json!({}))).unwrap().is_none());
        assert!(build_unexpected_table(&failing(json!({ "partial_unexpected_list": [] })))
            .unwrap()
            .is_none());

        let mut no_result = failing(json!({}));
        no_result.result = None;
        assert!(build_unexpected_table(&no_result).unwrap().is_none());
    }

    #[test]
    fn test_malformed_counts_is_error() {
        let result = failing(json!({ "partial_unexpected_counts": [5] }));
        assert!(matches!(
            build_unexpected_table(&result),
            Err(RenderError::InvalidField { .. })
        ));
    }
}
