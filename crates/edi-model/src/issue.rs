use serde::{Deserialize, Serialize};

use crate::rule::ValidationRule;
use crate::segment::Segment;

/// A validation finding. Findings are data, never raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Configured error code of the rule that fired.
    pub code: String,
    pub message: String,
    /// Element designator, e.g. `NM103`.
    pub element: Option<String>,
    pub value: Option<String>,
    pub segment: Option<String>,
    pub segment_raw: Option<String>,
}

impl ValidationError {
    /// Finding for a rule, without segment context.
    pub fn from_rule(rule: &ValidationRule) -> Self {
        Self {
            code: rule.error_code.clone(),
            message: rule.error_message.clone(),
            element: None,
            value: None,
            segment: None,
            segment_raw: None,
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>, value: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self.value = Some(value.into());
        self
    }

    /// Attach the segment the finding was raised against.
    #[must_use]
    pub fn in_segment(mut self, segment: &Segment) -> Self {
        self.segment = Some(segment.segment_id().to_string());
        self.segment_raw = Some(segment.raw().to_string());
        self
    }
}
