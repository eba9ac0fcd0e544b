//! Expectation descriptions.
//!
//! The prose describing what an expectation asserts is produced by
//! describers registered per expectation type. Lookups never fail: types
//! without a registered describer resolve to the registry's fallback.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::content::{ContentFragment, ElementStyling, StringTemplate, Styling};
use crate::result::ExpectationConfig;

/// Produces the description fragments for one expectation.
pub trait ExpectationDescriber: Send + Sync {
    fn describe(
        &self,
        config: &ExpectationConfig,
        styling: Option<&Styling>,
        include_column_name: bool,
    ) -> Vec<ContentFragment>;
}

impl<F> ExpectationDescriber for F
where
    F: Fn(&ExpectationConfig, Option<&Styling>, bool) -> Vec<ContentFragment> + Send + Sync,
{
    fn describe(
        &self,
        config: &ExpectationConfig,
        styling: Option<&Styling>,
        include_column_name: bool,
    ) -> Vec<ContentFragment> {
        self(config, styling, include_column_name)
    }
}

/// Describes an expectation nobody registered a describer for, as
/// `expectation_type(**kwargs)` in a warning alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingExpectationDescriber;

impl ExpectationDescriber for MissingExpectationDescriber {
    fn describe(
        &self,
        config: &ExpectationConfig,
        _styling: Option<&Styling>,
        _include_column_name: bool,
    ) -> Vec<ContentFragment> {
        let template = StringTemplate::new("$expectation_type(**$kwargs)")
            .with_param("expectation_type", config.expectation_type.clone())
            .with_param("kwargs", Value::Object(config.kwargs.clone()))
            .with_styling(Styling::new().with_param(
                "expectation_type",
                ElementStyling::classes(&["badge", "badge-warning"]),
            ));

        vec![ContentFragment::template(template).with_styling(
            Styling::new().with_parent(ElementStyling::classes(&["alert", "alert-warning"])),
        )]
    }
}

/// Explicit mapping from expectation type to describer, with a fallback.
pub struct DescriberRegistry {
    describers: HashMap<String, Box<dyn ExpectationDescriber>>,
    fallback: Box<dyn ExpectationDescriber>,
}

impl DescriberRegistry {
    /// An empty registry falling back to [`MissingExpectationDescriber`].
    pub fn new() -> Self {
        Self {
            describers: HashMap::new(),
            fallback: Box::new(MissingExpectationDescriber),
        }
    }

    pub fn with_fallback(mut self, fallback: impl ExpectationDescriber + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Register a describer for an expectation type, replacing any
    /// previous one.
    pub fn register(
        mut self,
        expectation_type: impl Into<String>,
        describer: impl ExpectationDescriber + 'static,
    ) -> Self {
        self.describers
            .insert(expectation_type.into(), Box::new(describer));
        self
    }

    pub fn contains(&self, expectation_type: &str) -> bool {
        self.describers.contains_key(expectation_type)
    }

    /// The describer for a type, or the fallback.
    pub fn resolve(&self, expectation_type: &str) -> &dyn ExpectationDescriber {
        match self.describers.get(expectation_type) {
            Some(describer) => describer.as_ref(),
            None => {
                debug!(expectation_type, "No describer registered, using fallback");
                self.fallback.as_ref()
            }
        }
    }

    /// Describe an expectation. The result is never empty.
    pub fn describe(
        &self,
        config: &ExpectationConfig,
        styling: Option<&Styling>,
        include_column_name: bool,
    ) -> Vec<ContentFragment> {
        let fragments = self
            .resolve(&config.expectation_type)
            .describe(config, styling, include_column_name);
        if !fragments.is_empty() {
            return fragments;
        }

        debug!(
            expectation_type = %config.expectation_type,
            "Describer returned no fragments, using fallback"
        );
        let fragments = self.fallback.describe(config, styling, include_column_name);
        if fragments.is_empty() {
            MissingExpectationDescriber.describe(config, styling, include_column_name)
        } else {
            fragments
        }
    }
}

impl Default for DescriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DescriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.describers.keys().collect();
        types.sort();
        f.debug_struct("DescriberRegistry")
            .field("describers", &types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn not_null(
        config: &ExpectationConfig,
        _styling: Option<&Styling>,
        include_column_name: bool,
    ) -> Vec<ContentFragment> {
        let template = if include_column_name {
            StringTemplate::new("$column values must never be null.")
                .with_param("column", config.column().unwrap_or_default())
        } else {
            StringTemplate::new("values must never be null.")
        };
        vec![ContentFragment::template(template)]
    }

    #[test]
    fn test_registered_describer_is_used() {
        let registry =
            DescriberRegistry::new().register("expect_column_values_to_not_be_null", not_null);
        let config =
            ExpectationConfig::new("expect_column_values_to_not_be_null").with_kwarg("column", "id");

        let fragments = registry.describe(&config, None, true);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].to_plain_text(), "id values must never be null.");

        let fragments = registry.describe(&config, None, false);
        assert_eq!(fragments[0].to_plain_text(), "values must never be null.");
    }

    #[test]
    fn test_unregistered_type_uses_fallback() {
        let registry = DescriberRegistry::new();
        let config = ExpectationConfig::new("expect_custom_thing").with_kwarg("threshold", 3);

        assert!(!registry.contains("expect_custom_thing"));
        let fragments = registry.describe(&config, None, true);
        assert_eq!(fragments.len(), 1);

        let template = fragments[0].as_string_template().unwrap();
        assert_eq!(template.template, "$expectation_type(**$kwargs)");
        assert_eq!(template.params["expectation_type"], json!("expect_custom_thing"));
        assert_eq!(template.params["kwargs"], json!({ "threshold": 3 }));

        let parent = fragments[0].styling().and_then(|s| s.parent.as_ref()).unwrap();
        assert!(parent.classes.contains(&"alert-warning".to_string()));
    }

    #[test]
    fn test_empty_description_falls_back() {
        let registry = DescriberRegistry::new()
            .register(
                "expect_silence",
                |_: &ExpectationConfig, _: Option<&Styling>, _: bool| -> Vec<ContentFragment> {
                    Vec::new()
                },
            )
            .with_fallback(
                |_: &ExpectationConfig, _: Option<&Styling>, _: bool| -> Vec<ContentFragment> {
                    Vec::new()
                },
            );

        let fragments = registry.describe(&ExpectationConfig::new("expect_silence"), None, true);
        assert_eq!(fragments.len(), 1);
    }
}
