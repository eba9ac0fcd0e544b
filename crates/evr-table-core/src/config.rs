//! Rendering configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::content::{ElementStyling, Styling};

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Options for rendering a results table.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether descriptions name the column they apply to
    pub include_column_name: bool,

    /// Optional title shown above the table
    pub header: Option<String>,

    /// Replaces the default table block styling
    pub content_block_styling: Option<Styling>,

    /// Styling passed to expectation describers
    pub element_styling: Styling,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_column_name: true,
            header: None,
            content_block_styling: None,
            element_styling: default_element_styling(),
        }
    }
}

impl RenderConfig {
    /// Parse config from a YAML (or JSON) string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse config from a YAML (or JSON) file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// The table block styling in effect.
    pub fn block_styling(&self) -> Styling {
        self.content_block_styling
            .clone()
            .unwrap_or_else(default_content_block_styling)
    }
}

/// Secondary badges for parameters, primary badges for the column name.
pub fn default_element_styling() -> Styling {
    Styling::new()
        .with_classes(&["badge", "badge-secondary"])
        .with_param("column", ElementStyling::classes(&["badge", "badge-primary"]))
}

pub fn default_content_block_styling() -> Styling {
    Styling::new()
        .with_classes(&["ml-2", "mr-2", "mt-0", "mb-0", "table-responsive"])
        .with_body(ElementStyling::classes(&["table"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RenderConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert!(config.include_column_name);
        assert_eq!(config.block_styling(), default_content_block_styling());
    }

    #[test]
    fn test_parse_config() {
        let config = RenderConfig::from_yaml(
            r#"
include_column_name: false
header: "Column: age"
content_block_styling:
  classes: ["table-dark"]
  body:
    classes: ["table", "table-striped"]
"#,
        )
        .unwrap();

        assert!(!config.include_column_name);
        assert_eq!(config.header.as_deref(), Some("Column: age"));
        let styling = config.block_styling();
        assert!(styling.has_class("table-dark"));
        assert_eq!(
            styling.body.unwrap().classes,
            vec!["table".to_string(), "table-striped".to_string()]
        );
        assert_eq!(config.element_styling, default_element_styling());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RenderConfig::from_yaml("include_column_name: [1, 2]"),
            Err(ConfigError::YamlError(_))
        ));
    }
}
