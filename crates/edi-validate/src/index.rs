//! Per-run rule index.
//!
//! Rules are sorted once into three buckets: element rules keyed by segment id,
//! segment presence rules, and envelope cross-reference rules. Regex patterns
//! are compiled here so each pattern is built once per run, not once per
//! segment.

use std::collections::HashMap;

use edi_model::{RuleType, ValidationRule};
use regex::Regex;

/// Envelope segments whose rules apply to headers and trailers rather than
/// to data segments.
pub const ENVELOPE_SEGMENTS: [&str; 6] = ["ISA", "IEA", "GS", "GE", "ST", "SE"];

/// An element rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule<'a> {
    pub rule: &'a ValidationRule,
    /// Anchored pattern; `None` when the rule has no pattern or it failed to compile.
    pub pattern: Option<Regex>,
}

impl<'a> CompiledRule<'a> {
    fn compile(rule: &'a ValidationRule) -> Self {
        let pattern = rule
            .regex_pattern
            .as_deref()
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .and_then(|pattern| match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(regex) => Some(regex),
                Err(error) => {
                    tracing::warn!(
                        rule = %rule.name,
                        pattern,
                        %error,
                        "invalid regex pattern, skipping pattern check"
                    );
                    None
                }
            });
        Self { rule, pattern }
    }
}

/// Active rules bucketed by how the engine applies them.
#[derive(Debug, Default)]
pub struct RuleIndex<'a> {
    element_rules: HashMap<String, Vec<CompiledRule<'a>>>,
    presence_rules: Vec<&'a ValidationRule>,
    envelope_rules: Vec<&'a ValidationRule>,
}

impl<'a> RuleIndex<'a> {
    /// Index the active rules, keeping configuration order within each bucket.
    pub fn new(rules: &'a [ValidationRule]) -> Self {
        let mut index = Self::default();
        for rule in rules.iter().filter(|rule| rule.is_active) {
            match (rule.element_position, rule.rule_type) {
                (Some(_), _) => index
                    .element_rules
                    .entry(rule.segment_id.trim().to_uppercase())
                    .or_default()
                    .push(CompiledRule::compile(rule)),
                (None, RuleType::RequiredSegment) => index.presence_rules.push(rule),
                (None, RuleType::CrossReference) => index.envelope_rules.push(rule),
                (None, rule_type) => {
                    tracing::debug!(
                        rule = %rule.name,
                        %rule_type,
                        "rule has no element position, ignoring"
                    );
                }
            }
        }
        index
    }

    /// Element rules for a segment id, in configuration order.
    pub fn element_rules(&self, segment_id: &str) -> &[CompiledRule<'a>] {
        self.element_rules
            .get(segment_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Presence rules for one envelope segment id.
    pub fn presence_rules_for<'s>(
        &'s self,
        segment_id: &'s str,
    ) -> impl Iterator<Item = &'a ValidationRule> + 's {
        self.presence_rules
            .iter()
            .copied()
            .filter(move |rule| rule.segment_id.eq_ignore_ascii_case(segment_id))
    }

    /// Presence rules checked against a transaction's data segments.
    pub fn data_presence_rules(&self) -> impl Iterator<Item = &'a ValidationRule> + '_ {
        self.presence_rules.iter().copied().filter(|rule| {
            !ENVELOPE_SEGMENTS
                .iter()
                .any(|id| rule.segment_id.eq_ignore_ascii_case(id))
        })
    }

    /// Cross-reference rules for one trailer segment id.
    pub fn envelope_rules_for<'s>(
        &'s self,
        segment_id: &'s str,
    ) -> impl Iterator<Item = &'a ValidationRule> + 's {
        self.envelope_rules
            .iter()
            .copied()
            .filter(move |rule| rule.segment_id.eq_ignore_ascii_case(segment_id))
    }

    /// True when no active rule was indexed.
    pub fn is_empty(&self) -> bool {
        self.element_rules.is_empty()
            && self.presence_rules.is_empty()
            && self.envelope_rules.is_empty()
    }
}
