//! Evaluation result parsing from YAML/JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_result_schema;

/// Errors that can occur when loading evaluation results.
#[derive(Error, Debug)]
pub enum ResultError {
    #[error("Failed to read results file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema validation failed: {}", .0.join("; "))]
    SchemaError(Vec<String>),
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whether the expectation raised while being evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExceptionInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raised_exception: bool,

    #[serde(default)]
    pub exception_message: Option<String>,

    #[serde(default)]
    pub exception_traceback: Option<String>,
}

/// The assertion that was evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationConfig {
    /// Expectation identifier (e.g., "expect_column_values_to_not_be_null")
    pub expectation_type: String,

    /// Expectation parameters
    #[serde(default, alias = "params", deserialize_with = "null_as_default")]
    pub kwargs: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ExpectationConfig {
    pub fn new(expectation_type: impl Into<String>) -> Self {
        Self {
            expectation_type: expectation_type.into(),
            kwargs: Map::new(),
            meta: None,
        }
    }

    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// The `column` parameter, when the expectation targets one column.
    pub fn column(&self) -> Option<&str> {
        self.kwargs.get("column").and_then(Value::as_str)
    }
}

/// The outcome of checking one expectation against data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,

    /// Result payload (counts, samples, observed value)
    #[serde(default)]
    pub result: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub exception_info: ExceptionInfo,

    pub expectation_config: ExpectationConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl EvaluationResult {
    pub fn new(config: ExpectationConfig, success: bool) -> Self {
        Self {
            success,
            result: None,
            exception_info: ExceptionInfo::default(),
            expectation_config: config,
            meta: None,
        }
    }

    pub fn with_result(mut self, result: Map<String, Value>) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_exception(
        mut self,
        message: impl Into<String>,
        traceback: impl Into<String>,
    ) -> Self {
        self.exception_info = ExceptionInfo {
            raised_exception: true,
            exception_message: Some(message.into()),
            exception_traceback: Some(traceback.into()),
        };
        self
    }

    /// Deserialize a single result from an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, ResultError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn expectation_type(&self) -> &str {
        &self.expectation_config.expectation_type
    }

    pub fn raised_exception(&self) -> bool {
        self.exception_info.raised_exception
    }

    /// A raw field of the result payload. `Some(Value::Null)` means the
    /// field is present but null.
    pub fn result_field(&self, key: &str) -> Option<&Value> {
        self.result.as_ref().and_then(|r| r.get(key))
    }
}

/// The batch wrapper emitted by a validation run over a whole suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteValidationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,

    pub results: Vec<EvaluationResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Any accepted input document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValidationInput {
    Suite(SuiteValidationResult),
    Many(Vec<EvaluationResult>),
    Single(Box<EvaluationResult>),
}

impl ValidationInput {
    /// Schema-validate and deserialize an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, ResultError> {
        validate_result_schema(&value).map_err(ResultError::SchemaError)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Parse input from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ResultError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse input from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ResultError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse input from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResultError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse input from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ResultError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse input from a file, choosing YAML for `.yaml`/`.yml` and JSON
    /// otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResultError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_json_file(path),
        }
    }

    /// Normalize to a list of results in document order.
    pub fn into_results(self) -> Vec<EvaluationResult> {
        match self {
            Self::Suite(suite) => suite.results,
            Self::Many(results) => results,
            Self::Single(result) => vec![*result],
        }
    }
}
