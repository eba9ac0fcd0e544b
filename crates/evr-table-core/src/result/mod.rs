//! Evaluation result input model.
//!
//! Results are produced by a prior validation step and arrive as JSON or
//! YAML documents. This module handles loading them and validating them
//! against the embedded input schema.

mod parser;
mod schema;

pub use parser::{
    EvaluationResult, ExceptionInfo, ExpectationConfig, ResultError, SuiteValidationResult,
    ValidationInput,
};
pub use schema::{is_valid_result, validate_result_schema};
