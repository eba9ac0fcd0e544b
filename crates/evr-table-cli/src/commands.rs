//! CLI command implementations.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use evr_table_core::result::validate_result_schema;
use evr_table_core::{
    render_table, ContentBlock, ContentFragment, RenderConfig, StatusKind, ValidationInput,
};
use tracing::{debug, info, warn};

use crate::OutputFormat;

const INDENT: &str = "       ";

/// Render a results file and print the table block.
pub fn render(
    file: &Path,
    config_path: Option<&Path>,
    format: OutputFormat,
    no_column_name: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RenderConfig::from_yaml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if no_column_name {
        config.include_column_name = false;
    }
    debug!(?config, "config loaded");

    let results = ValidationInput::from_path(file)
        .with_context(|| format!("load results {}", file.display()))?
        .into_results();
    info!(results = results.len(), file = %file.display(), "rendering results");

    let Some(block) = render_table(&results, &config) else {
        warn!(file = %file.display(), "no results to render");
        return Ok(());
    };

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&block).context("serialize json")?,
        OutputFormat::Yaml => serde_yaml::to_string(&block).context("serialize yaml")?,
        OutputFormat::Text => format_text(&block),
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Validate a results file against the input schema.
pub fn validate(file: &Path) -> Result<()> {
    let contents =
        fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let document: serde_json::Value = if is_yaml(file) {
        serde_yaml::from_str(&contents).context("parse yaml")?
    } else {
        serde_json::from_str(&contents).context("parse json")?
    };

    match validate_result_schema(&document) {
        Ok(()) => {
            println!("valid: {}", file.display());
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {}", error);
            }
            bail!(
                "{} schema violation(s) in {}",
                errors.len(),
                file.display()
            )
        }
    }
}

fn is_yaml(file: &Path) -> bool {
    matches!(
        file.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn status_label(status: &ContentFragment) -> &'static str {
    [
        (StatusKind::Success, "[PASS]"),
        (StatusKind::Failure, "[FAIL]"),
        (StatusKind::Warning, "[WARN]"),
    ]
    .into_iter()
    .find(|(kind, _)| kind.fragment() == *status)
    .map_or("[????]", |(_, label)| label)
}

/// Plain-text rendering: one block per row, evidence indented below.
fn format_text(block: &ContentBlock) -> String {
    let mut lines = Vec::new();
    if let Some(header) = &block.header {
        lines.push(header.to_plain_text());
        lines.push(String::new());
    }

    for row in &block.table {
        let description = row.description.to_plain_text();
        let mut description_lines = description
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty());

        let first = description_lines.next().unwrap_or_default();
        lines.push(format!("{} {}", status_label(&row.status), first));
        lines.extend(description_lines.map(|line| format!("{INDENT}{line}")));

        let observed = row.observed_value.to_plain_text();
        let mut observed_lines = observed.lines();
        lines.push(format!(
            "{INDENT}{}: {}",
            block.header_row.get(2).map_or("Observed Value", String::as_str),
            observed_lines.next().unwrap_or_default()
        ));
        lines.extend(observed_lines.map(|line| format!("{INDENT}  {line}")));
    }

    lines.join("\n")
}
