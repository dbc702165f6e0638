//! Configurable validation rules.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of check a rule describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// The segment must occur in its scope.
    RequiredSegment,
    /// The element must be populated.
    RequiredElement,
    /// Length and pattern checks.
    FormatValidation,
    /// Value must come from a code list.
    CodeValidation,
    /// Envelope header and trailer must agree.
    CrossReference,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::RequiredSegment => "REQUIRED_SEGMENT",
            RuleType::RequiredElement => "REQUIRED_ELEMENT",
            RuleType::FormatValidation => "FORMAT_VALIDATION",
            RuleType::CodeValidation => "CODE_VALIDATION",
            RuleType::CrossReference => "CROSS_REFERENCE",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = ModelError;

    /// Accepts the upper-snake names in any case, with `-` or space for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "REQUIRED_SEGMENT" => Ok(RuleType::RequiredSegment),
            "REQUIRED_ELEMENT" => Ok(RuleType::RequiredElement),
            "FORMAT_VALIDATION" => Ok(RuleType::FormatValidation),
            "CODE_VALIDATION" => Ok(RuleType::CodeValidation),
            "CROSS_REFERENCE" => Ok(RuleType::CrossReference),
            _ => Err(ModelError::UnknownRuleType(s.to_string())),
        }
    }
}

/// A validation rule. Read-only while a document is being validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Unique rule name.
    pub name: String,
    pub rule_type: RuleType,
    pub segment_id: String,
    /// 1-based element position within the segment.
    #[serde(default)]
    pub element_position: Option<usize>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub valid_codes: Option<BTreeSet<String>>,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    pub error_code: String,
    pub error_message: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ValidationRule {
    /// A rule with no checks configured; fill in the rest with struct update syntax.
    pub fn new(
        name: impl Into<String>,
        rule_type: RuleType,
        segment_id: impl Into<String>,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rule_type,
            segment_id: segment_id.into(),
            element_position: None,
            required: false,
            min_length: None,
            max_length: None,
            valid_codes: None,
            regex_pattern: None,
            error_code: error_code.into(),
            error_message: error_message.into(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.element_position = Some(position);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    #[must_use]
    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.regex_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
