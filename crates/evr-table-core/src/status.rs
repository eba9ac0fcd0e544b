//! Status classification.
//!
//! First match wins:
//! 1. An exception was raised → WARNING
//! 2. The expectation succeeded → SUCCESS
//! 3. Otherwise → FAILURE

use serde::{Deserialize, Serialize};

use crate::content::{ContentFragment, ElementStyling, StringTemplate, Styling};
use crate::result::EvaluationResult;

/// Parent class that lets a "hide succeeded" view mode drop the row.
pub const HIDE_SUCCEEDED_CHILD_CLASS: &str = "hide-succeeded-validation-target-child";

/// The outcome shown in the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Warning,
    Success,
    Failure,
}

impl StatusKind {
    pub fn classify(result: &EvaluationResult) -> Self {
        if result.raised_exception() {
            Self::Warning
        } else if result.success {
            Self::Success
        } else {
            Self::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn icon_classes(&self) -> [&'static str; 3] {
        match self {
            Self::Warning => ["fas", "fa-exclamation-triangle", "text-warning"],
            Self::Success => ["fas", "fa-check-circle", "text-success"],
            Self::Failure => ["fas", "fa-times", "text-danger"],
        }
    }

    /// The icon fragment for this status.
    pub fn fragment(&self) -> ContentFragment {
        let icon = ElementStyling::classes(&self.icon_classes()).with_tag("i");
        let template = StringTemplate::new("$icon")
            .with_param("icon", "")
            .with_styling(Styling::new().with_param("icon", icon));

        let fragment = ContentFragment::template(template);
        match self {
            Self::Success => fragment.with_styling(
                Styling::new().with_parent(ElementStyling::classes(&[HIDE_SUCCEEDED_CHILD_CLASS])),
            ),
            _ => fragment,
        }
    }
}

/// The status cell for a result.
pub fn classify_status(result: &EvaluationResult) -> ContentFragment {
    StatusKind::classify(result).fragment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExpectationConfig;

    fn result(success: bool) -> EvaluationResult {
        EvaluationResult::new(ExpectationConfig::new("expect_column_to_exist"), success)
    }

    fn icon_classes(fragment: &ContentFragment) -> Vec<String> {
        fragment
            .as_string_template()
            .and_then(|t| t.styling.as_ref())
            .and_then(|s| s.params.get("icon"))
            .map(|icon| icon.classes.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_exception_wins_over_success() {
        let evr = result(true).with_exception("boom", "trace");
        assert_eq!(StatusKind::classify(&evr), StatusKind::Warning);

        let fragment = classify_status(&evr);
        assert!(icon_classes(&fragment).contains(&"fa-exclamation-triangle".to_string()));
        assert!(fragment.styling().is_none());
    }

    #[test]
    fn test_success_is_hideable() {
        let fragment = classify_status(&result(true));

        assert!(icon_classes(&fragment).contains(&"fa-check-circle".to_string()));
        let parent = fragment.styling().and_then(|s| s.parent.as_ref()).unwrap();
        assert_eq!(parent.classes, vec![HIDE_SUCCEEDED_CHILD_CLASS.to_string()]);
    }

    #[test]
    fn test_failure() {
        let fragment = classify_status(&result(false));

        assert_eq!(StatusKind::classify(&result(false)), StatusKind::Failure);
        assert!(icon_classes(&fragment).contains(&"fa-times".to_string()));
        assert!(fragment.styling().is_none());
    }

    #[test]
    fn test_icon_tag() {
        let fragment = classify_status(&result(false));
        let template = fragment.as_string_template().unwrap();
        assert_eq!(template.template, "$icon");
        let icon = &template.styling.as_ref().unwrap().params["icon"];
        assert_eq!(icon.tag.as_deref(), Some("i"));
    }
}
