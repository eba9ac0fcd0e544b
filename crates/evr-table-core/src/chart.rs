//! Distribution rendering for partition objects.
//!
//! A partition describes an observed distribution either as continuous bins
//! (`bins` edges + `weights`, optional `tail_weights`) or as categorical
//! values (`values` + `weights`).

use serde_json::Value;

use crate::content::{ContentFragment, ElementStyling, Styling, TableCell};
use crate::format::{DecimalFormatter, NumberFormatter, DEFAULT_PRECISION};
use crate::values::{as_number, display_value};
use crate::RenderError;

/// Renders an observed distribution into a fragment.
pub trait DistributionRenderer: Send + Sync {
    fn render_distribution(&self, partition: &Value) -> Result<ContentFragment, RenderError>;
}

/// Renders a partition as a two-column table of buckets and weights.
#[derive(Debug, Clone, Default)]
pub struct PartitionTableRenderer {
    formatter: DecimalFormatter,
}

impl PartitionTableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatter(formatter: DecimalFormatter) -> Self {
        Self { formatter }
    }

    fn weight(&self, weight: f64) -> TableCell {
        self.formatter.format(weight, DEFAULT_PRECISION, false).into()
    }

    fn continuous(&self, bins: &[f64], weights: &[f64], tails: Option<&[f64]>) -> Vec<Vec<TableCell>> {
        let mut rows = Vec::with_capacity(weights.len() + 2);
        let edge = |v: f64| self.formatter.format(v, DEFAULT_PRECISION, false);

        if let (Some(&[low, _]), Some(&first)) = (tails, bins.first()) {
            rows.push(vec![format!("(-inf, {})", edge(first)).into(), self.weight(low)]);
        }
        for (i, weight) in weights.iter().enumerate() {
            let bucket = format!("[{}, {})", edge(bins[i]), edge(bins[i + 1]));
            rows.push(vec![bucket.into(), self.weight(*weight)]);
        }
        if let (Some(&[_, high]), Some(&last)) = (tails, bins.last()) {
            rows.push(vec![format!("[{}, inf)", edge(last)).into(), self.weight(high)]);
        }
        rows
    }
}

fn numbers(partition: &Value, key: &str) -> Result<Option<Vec<f64>>, RenderError> {
    let Some(value) = partition.get(key).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let items = value
        .as_array()
        .ok_or_else(|| RenderError::Partition(format!("{key} must be an array")))?;
    items
        .iter()
        .map(|item| {
            as_number(item).ok_or_else(|| RenderError::Partition(format!("{key} must be numeric")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

impl DistributionRenderer for PartitionTableRenderer {
    fn render_distribution(&self, partition: &Value) -> Result<ContentFragment, RenderError> {
        let weights = numbers(partition, "weights")?
            .ok_or_else(|| RenderError::Partition("missing weights".to_string()))?;

        let (header, rows) = if let Some(bins) = numbers(partition, "bins")? {
            if bins.len() != weights.len() + 1 {
                return Err(RenderError::Partition(format!(
                    "{} bin edges for {} weights",
                    bins.len(),
                    weights.len()
                )));
            }
            let tails = numbers(partition, "tail_weights")?;
            if tails.as_ref().is_some_and(|t| t.len() != 2) {
                return Err(RenderError::Partition(
                    "tail_weights must have two entries".to_string(),
                ));
            }
            (
                ["Interval", "Fraction"],
                self.continuous(&bins, &weights, tails.as_deref()),
            )
        } else if let Some(values) = partition.get("values").and_then(Value::as_array) {
            if values.len() != weights.len() {
                return Err(RenderError::Partition(format!(
                    "{} values for {} weights",
                    values.len(),
                    weights.len()
                )));
            }
            let rows = values
                .iter()
                .zip(&weights)
                .map(|(value, weight)| vec![display_value(value).into(), self.weight(*weight)])
                .collect();
            (["Value", "Fraction"], rows)
        } else {
            return Err(RenderError::Partition(
                "expected bins or values".to_string(),
            ));
        };

        Ok(ContentFragment::table(&header, rows).with_styling(
            Styling::new().with_body(ElementStyling::classes(&["table", "table-sm", "col-6"])),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_continuous_partition() {
        let partition = json!({
            "bins": [0, 1, 2],
            "weights": [0.25, 0.75],
            "tail_weights": [0, 0]
        });

        let fragment = PartitionTableRenderer::new()
            .render_distribution(&partition)
            .unwrap();

        assert_eq!(
            fragment.to_plain_text(),
            "Interval | Fraction\n(-inf, 0) | 0\n[0, 1) | 0.25\n[1, 2) | 0.75\n[2, inf) | 0"
        );
    }

    #[test]
    fn test_categorical_partition() {
        let partition = json!({ "values": ["a", "b"], "weights": [0.4, 0.6] });

        let fragment = PartitionTableRenderer::new()
            .render_distribution(&partition)
            .unwrap();

        assert_eq!(fragment.to_plain_text(), "Value | Fraction\na | 0.4\nb | 0.6");
    }

    #[test]
    fn test_malformed_partition() {
        let renderer = PartitionTableRenderer::new();

        assert!(renderer.render_distribution(&json!({})).is_err());
        assert!(renderer
            .render_distribution(&json!({ "bins": [0, 1], "weights": [0.5, 0.5] }))
            .is_err());
        assert!(renderer
            .render_distribution(&json!({ "values": ["a"], "weights": ["x"] }))
            .is_err());
    }
}
