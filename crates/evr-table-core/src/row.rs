//! Row composition.
//!
//! The composer turns one evaluation result into one table row:
//! `[status, description (+ evidence), observed value]`.
//!
//! Evidence and observed-value steps are isolated from each other. A step
//! that fails is logged and replaced by its default (no statement, no
//! table, `--`), so a single malformed field never blanks the whole row.

use tracing::error;

use crate::chart::{DistributionRenderer, PartitionTableRenderer};
use crate::content::{ContentFragment, DescriptionCell, ObservedValue, Styling, TableRow};
use crate::description::DescriberRegistry;
use crate::format::{DecimalFormatter, NumberFormatter};
use crate::observed::ObservedValueFormatter;
use crate::result::EvaluationResult;
use crate::status::classify_status;
use crate::unexpected::{build_unexpected_statement, build_unexpected_table};
use crate::RenderError;

/// Composes table rows from evaluation results.
pub struct RowComposer {
    describers: DescriberRegistry,
    formatter: Box<dyn NumberFormatter>,
    distributions: Box<dyn DistributionRenderer>,
}

impl RowComposer {
    /// A composer with an empty describer registry, the default number
    /// formatter, and partition tables for distributions.
    pub fn new() -> Self {
        Self {
            describers: DescriberRegistry::new(),
            formatter: Box::new(DecimalFormatter::new()),
            distributions: Box::new(PartitionTableRenderer::new()),
        }
    }

    pub fn with_describers(mut self, describers: DescriberRegistry) -> Self {
        self.describers = describers;
        self
    }

    pub fn with_formatter(mut self, formatter: impl NumberFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_distribution_renderer(
        mut self,
        distributions: impl DistributionRenderer + 'static,
    ) -> Self {
        self.distributions = Box::new(distributions);
        self
    }

    pub fn describers(&self) -> &DescriberRegistry {
        &self.describers
    }

    /// Build the row for one evaluation result.
    ///
    /// Always returns exactly one row.
    pub fn build_row(
        &self,
        result: &EvaluationResult,
        styling: Option<&Styling>,
        include_column_name: bool,
    ) -> Vec<TableRow> {
        let description = self.describers.describe(
            &result.expectation_config,
            styling,
            include_column_name,
        );
        let status = classify_status(result);

        let statement = recover(
            result,
            "unexpected_statement",
            build_unexpected_statement(result, self.formatter.as_ref()),
        )
        .unwrap_or_default();
        let table = recover(result, "unexpected_table", build_unexpected_table(result)).flatten();
        let observed_value = recover(
            result,
            "observed_value",
            ObservedValueFormatter::new(self.formatter.as_ref(), self.distributions.as_ref())
                .format(result),
        )
        .unwrap_or_else(ObservedValue::placeholder);

        vec![TableRow {
            status,
            description: merge_description(description, statement, table),
            observed_value,
        }]
    }
}

impl Default for RowComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed sub-step and drop its output.
fn recover<T>(result: &EvaluationResult, step: &str, outcome: Result<T, RenderError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            error!(
                expectation_type = %result.expectation_type(),
                step,
                error = %e,
                "Rendering step failed, using default"
            );
            None
        }
    }
}

/// A lone description stays inline; attached evidence turns the cell into
/// a list.
fn merge_description(
    description: Vec<ContentFragment>,
    statement: Vec<ContentFragment>,
    table: Option<ContentFragment>,
) -> DescriptionCell {
    let mut fragments = description;
    fragments.extend(statement);
    fragments.extend(table);

    if fragments.len() > 1 {
        DescriptionCell::List(fragments)
    } else {
        match fragments.pop() {
            Some(fragment) => DescriptionCell::Inline(fragment),
            None => DescriptionCell::List(fragments),
        }
    }
}
