//! JSON Schema validation for validation-result documents.
//!
//! Input documents are validated against schema/validation-input.schema.json
//! before they are deserialized, so malformed input is reported with paths
//! instead of a single serde message.

use serde_json::Value;
use std::sync::OnceLock;

const RESULT_SCHEMA_JSON: &str = include_str!("../../schema/validation-input.schema.json");

/// Compiled once; a schema that fails to load is reported on every call.
static VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn validator() -> Result<&'static jsonschema::Validator, String> {
    VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(RESULT_SCHEMA_JSON)
                .map_err(|e| format!("input schema is not valid JSON: {e}"))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("input schema does not compile: {e}"))
        })
        .as_ref()
        .map_err(String::clone)
}

/// Validate a results document against the schema.
///
/// # Returns
///
/// * `Ok(())` - Document is a result, a list of results, or a suite result
/// * `Err(Vec<String>)` - List of validation errors with instance paths
pub fn validate_result_schema(document: &Value) -> Result<(), Vec<String>> {
    let validator = validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether a results document matches the schema.
pub fn is_valid_result(document: &Value) -> bool {
    validator().is_ok_and(|v| v.is_valid(document))
}
