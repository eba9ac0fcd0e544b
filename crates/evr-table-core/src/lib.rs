//! # evr-table-core
//!
//! Deterministic rendering of validation results into table content blocks.
//!
//! This crate turns the outcome of a prior validation step (an evaluation
//! result) into a presentation-ready row of content fragments:
//! - Did the expectation pass, fail, or raise?
//! - What was asserted, and what evidence contradicts it?
//! - What value was actually observed?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **Never fails a row**: Every evaluation result yields exactly one row
//! 3. **Isolated sub-steps**: A broken field blanks only its own fragment
//! 4. **Ordered**: Rows follow input order
//!
//! ## Example
//!
//! ```rust,ignore
//! use evr_table_core::{render_table, RenderConfig, ValidationInput};
//!
//! let input = ValidationInput::from_json_file("validation.json")?;
//! let block = render_table(&input.into_results(), &RenderConfig::default());
//!
//! if let Some(block) = block {
//!     println!("{}", serde_json::to_string_pretty(&block)?);
//! }
//! ```

pub mod chart;
pub mod config;
pub mod content;
pub mod description;
pub mod format;
pub mod observed;
pub mod result;
pub mod row;
pub mod status;
pub mod table;
pub mod unexpected;

mod values;

// Re-export main types at crate root
pub use chart::{DistributionRenderer, PartitionTableRenderer};
pub use config::{ConfigError, RenderConfig};
pub use content::{
    ContentBlock, ContentFragment, DescriptionCell, ElementStyling, ObservedValue,
    StringTemplate, Styling, TableCell, TableRow,
};
pub use description::{DescriberRegistry, ExpectationDescriber, MissingExpectationDescriber};
pub use format::{DecimalFormatter, NumberFormatter};
pub use observed::ObservedValueFormatter;
pub use result::{
    EvaluationResult, ExceptionInfo, ExpectationConfig, ResultError, SuiteValidationResult,
    ValidationInput,
};
pub use row::RowComposer;
pub use status::StatusKind;
pub use table::TableRenderer;

use thiserror::Error;

/// Errors raised inside a single rendering sub-step.
///
/// These never escape [`RowComposer::build_row`]; the composer logs them
/// and substitutes the sub-step's default output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: expected {expected}")]
    InvalidField { field: String, expected: String },

    #[error("Malformed partition: {0}")]
    Partition(String),
}

impl RenderError {
    pub(crate) fn invalid(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// Render a list of evaluation results into a single table content block.
///
/// This is the main entry point. It uses the default row composer (fallback
/// descriptions only, default number formatting and partition tables).
///
/// # Returns
///
/// `None` when `results` is empty, otherwise a block with one row per
/// result in input order.
pub fn render_table(results: &[EvaluationResult], config: &RenderConfig) -> Option<ContentBlock> {
    TableRenderer::new(config.clone()).render(results)
}
