//! Observed-value formatting.
//!
//! Dispatch by expectation type, first match wins:
//! 1. No result payload → `--`
//! 2. KL divergence → divergence text + observed distribution
//! 3. Quantile values → quantile table
//! 4. Truthy `observed_value` → formatted number or its text
//! 5. Values-to-be-null → `<100 - unexpected_percent>% null`
//! 6. Values-to-not-be-null → `<100 - unexpected_percent>% not null`
//! 7. `unexpected_percent` present → `<percent>% unexpected`
//! 8. Otherwise → `--`

use serde_json::{Map, Value};

use crate::chart::DistributionRenderer;
use crate::content::{
    ContentFragment, ElementStyling, ObservedValue, StringTemplate, Styling, TableCell,
};
use crate::format::{NumberFormatter, DEFAULT_PRECISION};
use crate::result::EvaluationResult;
use crate::values::{as_number, display_value, is_truthy, require_number};
use crate::RenderError;

pub const KL_DIVERGENCE: &str = "expect_column_kl_divergence_to_be_less_than";
pub const QUANTILE_VALUES: &str = "expect_column_quantile_values_to_be_between";
pub const VALUES_TO_BE_NULL: &str = "expect_column_values_to_be_null";
pub const VALUES_TO_NOT_BE_NULL: &str = "expect_column_values_to_not_be_null";

/// Shown when the divergence could not be computed.
const UNDEFINED_DIVERGENCE: &str = "None (-infinity, infinity, or NaN)";

const OBSERVED_PRECISION: usize = 10;
const PERCENT_PRECISION: usize = 5;

/// Formats the observed-value column for a result.
pub struct ObservedValueFormatter<'a> {
    formatter: &'a dyn NumberFormatter,
    distributions: &'a dyn DistributionRenderer,
}

impl<'a> ObservedValueFormatter<'a> {
    pub fn new(
        formatter: &'a dyn NumberFormatter,
        distributions: &'a dyn DistributionRenderer,
    ) -> Self {
        Self {
            formatter,
            distributions,
        }
    }

    pub fn format(&self, result: &EvaluationResult) -> Result<ObservedValue, RenderError> {
        let Some(payload) = result.result.as_ref() else {
            return Ok(ObservedValue::placeholder());
        };

        match result.expectation_type() {
            KL_DIVERGENCE => return self.kl_divergence(payload),
            QUANTILE_VALUES => return quantile_values(payload),
            _ => {}
        }

        if let Some(observed) = payload.get("observed_value").filter(|v| is_truthy(v)) {
            let text = match observed {
                Value::Number(n) => self.formatter.format_json(n, OBSERVED_PRECISION, true),
                other => display_value(other),
            };
            return Ok(ObservedValue::Text(text));
        }

        match result.expectation_type() {
            VALUES_TO_BE_NULL => self.remaining_percent(payload, "null"),
            VALUES_TO_NOT_BE_NULL => self.remaining_percent(payload, "not null"),
            _ => match payload.get("unexpected_percent") {
                Some(Value::Null) | None => Ok(ObservedValue::placeholder()),
                Some(_) => {
                    let percent = require_number(payload, "unexpected_percent")?;
                    Ok(ObservedValue::Text(format!(
                        "{}% unexpected",
                        self.formatter.format(percent, PERCENT_PRECISION, false)
                    )))
                }
            },
        }
    }

    /// `100 - unexpected_percent` with a suffix, or `unknown % <suffix>`
    /// when the percentage was never reported.
    fn remaining_percent(
        &self,
        payload: &Map<String, Value>,
        suffix: &str,
    ) -> Result<ObservedValue, RenderError> {
        if !payload.contains_key("unexpected_percent") {
            return Ok(ObservedValue::Text(format!("unknown % {suffix}")));
        }
        let percent = require_number(payload, "unexpected_percent")?;
        Ok(ObservedValue::Text(format!(
            "{}% {suffix}",
            self.formatter.format(100.0 - percent, PERCENT_PRECISION, true)
        )))
    }

    fn kl_divergence(&self, payload: &Map<String, Value>) -> Result<ObservedValue, RenderError> {
        let Some(details) = payload.get("details").filter(|v| is_truthy(v)) else {
            return Ok(ObservedValue::placeholder());
        };
        let partition = details
            .get("observed_partition")
            .ok_or_else(|| RenderError::MissingField("details.observed_partition".to_string()))?;
        let distribution = self.distributions.render_distribution(partition)?;

        let divergence = match payload
            .get("observed_value")
            .filter(|v| is_truthy(v))
            .and_then(as_number)
        {
            Some(value) => self.formatter.format(value, DEFAULT_PRECISION, false),
            None => UNDEFINED_DIVERGENCE.to_string(),
        };
        let text = StringTemplate::new("KL Divergence: $observed_value")
            .with_param("observed_value", divergence)
            .with_styling(Styling::new().with_classes(&["mb-2"]));

        Ok(ObservedValue::Fragment(ContentFragment::container(vec![
            ContentFragment::template(text),
            distribution,
        ])))
    }
}

fn quantile_label(quantile: f64) -> String {
    if quantile == 0.25 {
        "Q1".to_string()
    } else if quantile == 0.5 {
        "Median".to_string()
    } else if quantile == 0.75 {
        "Q3".to_string()
    } else {
        format!("{:.2}", quantile)
    }
}

fn array_field<'a>(observed: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], RenderError> {
    match observed.get(key) {
        None => Ok(&[]),
        Some(value) => value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| RenderError::invalid(format!("observed_value.{key}"), "array")),
    }
}

fn quantile_values(payload: &Map<String, Value>) -> Result<ObservedValue, RenderError> {
    let observed = match payload.get("observed_value") {
        None | Some(Value::Null) => return Ok(ObservedValue::placeholder()),
        Some(observed) => observed
            .as_object()
            .ok_or_else(|| RenderError::invalid("observed_value", "object"))?,
    };

    let quantiles = array_field(observed, "quantiles")?;
    let values = array_field(observed, "values")?;

    let mut rows = Vec::with_capacity(quantiles.len());
    for (idx, quantile) in quantiles.iter().enumerate() {
        let quantile = as_number(quantile)
            .ok_or_else(|| RenderError::invalid("observed_value.quantiles", "numbers"))?;
        let value = values.get(idx).ok_or_else(|| {
            RenderError::invalid("observed_value.values", "one value per quantile")
        })?;
        let row: Vec<TableCell> = vec![quantile_label(quantile).into(), display_value(value).into()];
        rows.push(row);
    }

    Ok(ObservedValue::Fragment(
        ContentFragment::table(&["Quantile", "Value"], rows).with_styling(Styling::new().with_body(
            ElementStyling::classes(&["table", "table-sm", "table-unbordered", "col-4"]),
        )),
    ))
}
