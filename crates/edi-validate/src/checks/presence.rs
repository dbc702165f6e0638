//! Segment presence checks for `REQUIRED_SEGMENT` rules without a position.

use edi_model::{FunctionalGroup, ParsedDocument, TransactionSet, ValidationError, ValidationRule};

/// Finding for a segment that never occurred in its scope.
fn missing(rule: &ValidationRule) -> ValidationError {
    let mut finding = ValidationError::from_rule(rule);
    finding.segment = Some(rule.segment_id.clone());
    finding
}

/// Envelope header presence at interchange level (`ISA`, `GS`, `ST`).
pub fn check_envelope(rule: &ValidationRule, document: &ParsedDocument) -> Option<ValidationError> {
    let present = match rule.segment_id.to_ascii_uppercase().as_str() {
        "ISA" => !document.interchange.is_empty(),
        "GS" => !document.functional_groups.is_empty(),
        "ST" => document.transaction_count() > 0,
        "IEA" => document.interchange.trailer.is_some(),
        _ => true,
    };
    (!present).then(|| missing(rule))
}

/// `GE` presence for one group.
pub fn check_group_trailer(
    rule: &ValidationRule,
    group: &FunctionalGroup,
) -> Option<ValidationError> {
    group.trailer.is_none().then(|| missing(rule))
}

/// `SE` presence for one transaction set.
pub fn check_transaction_trailer(
    rule: &ValidationRule,
    transaction: &TransactionSet,
) -> Option<ValidationError> {
    transaction.trailer.is_none().then(|| missing(rule))
}

/// Data segment presence within one transaction set.
pub fn check_transaction(
    rule: &ValidationRule,
    transaction: &TransactionSet,
) -> Option<ValidationError> {
    let present = transaction
        .segments
        .iter()
        .any(|segment| segment.segment_id().eq_ignore_ascii_case(&rule.segment_id));
    (!present).then(|| missing(rule))
}
