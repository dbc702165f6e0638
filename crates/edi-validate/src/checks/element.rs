//! Element-level checks: required, length, code list and pattern.

use edi_model::{Segment, ValidationError};

use crate::index::CompiledRule;

/// Run one element rule against one segment occurrence.
///
/// Checks run in a fixed order. A required element that is empty yields a
/// single finding and nothing else; an empty optional element is skipped.
/// A position past the segment's last element skips the occurrence.
pub fn check(compiled: &CompiledRule<'_>, segment: &Segment) -> Vec<ValidationError> {
    let rule = compiled.rule;
    let Some(position) = rule.element_position.filter(|&p| p > 0) else {
        return Vec::new();
    };
    let Some(element) = segment.element(position) else {
        return Vec::new();
    };

    let text = element.as_text();
    let value = text.trim();
    let designator = segment.designator(position);
    let finding = || {
        ValidationError::from_rule(rule)
            .with_element(designator.as_str(), value)
            .in_segment(segment)
    };

    if value.is_empty() {
        return if rule.required {
            vec![finding()]
        } else {
            Vec::new()
        };
    }

    let mut findings = Vec::new();
    let length = value.chars().count();

    if rule.min_length.is_some_and(|min| length < min) {
        findings.push(finding());
    }
    if rule.max_length.is_some_and(|max| length > max) {
        findings.push(finding());
    }
    if let Some(codes) = rule.valid_codes.as_ref().filter(|codes| !codes.is_empty())
        && !codes.contains(value)
    {
        findings.push(finding());
    }
    if let Some(pattern) = &compiled.pattern
        && !pattern.is_match(value)
    {
        findings.push(finding());
    }

    findings
}
