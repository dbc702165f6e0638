//! Header/trailer consistency for `CROSS_REFERENCE` rules on `SE`, `GE` and `IEA`.
//!
//! A missing trailer is a finding only when the rule is `required`. Count
//! elements that do not parse as integers never match.

use edi_model::{
    FunctionalGroup, Interchange, TransactionSet, ValidationError, ValidationRule,
};

fn finding(rule: &ValidationRule, segment_id: &str) -> ValidationError {
    let mut finding = ValidationError::from_rule(rule);
    finding.segment = Some(segment_id.to_string());
    finding
}

fn mismatch(rule: &ValidationRule, segment_id: &str, position: usize, value: &str) -> ValidationError {
    finding(rule, segment_id).with_element(format!("{segment_id}{position:02}"), value)
}

fn count_matches(declared: &str, actual: usize) -> bool {
    declared.trim().parse::<usize>().is_ok_and(|count| count == actual)
}

/// `SE01` against the data segment count and `SE02` against `ST02`.
pub fn check_transaction(rule: &ValidationRule, transaction: &TransactionSet) -> Vec<ValidationError> {
    let Some(trailer) = &transaction.trailer else {
        return missing(rule, "SE");
    };
    let mut findings = Vec::new();
    if !count_matches(&trailer.segment_count, transaction.expected_segment_count()) {
        findings.push(mismatch(rule, "SE", 1, &trailer.segment_count));
    }
    if trailer.control_number != transaction.control_number {
        findings.push(mismatch(rule, "SE", 2, &trailer.control_number));
    }
    findings
}

/// `GE01` against the transaction count and `GE02` against `GS06`.
pub fn check_group(rule: &ValidationRule, group: &FunctionalGroup) -> Vec<ValidationError> {
    let Some(trailer) = &group.trailer else {
        return missing(rule, "GE");
    };
    let mut findings = Vec::new();
    if !count_matches(&trailer.transaction_count, group.transactions.len()) {
        findings.push(mismatch(rule, "GE", 1, &trailer.transaction_count));
    }
    if trailer.control_number != group.control_number {
        findings.push(mismatch(rule, "GE", 2, &trailer.control_number));
    }
    findings
}

/// `IEA01` against the group count and `IEA02` against `ISA13`.
pub fn check_interchange(
    rule: &ValidationRule,
    interchange: &Interchange,
    group_count: usize,
) -> Vec<ValidationError> {
    let Some(trailer) = &interchange.trailer else {
        return missing(rule, "IEA");
    };
    let mut findings = Vec::new();
    if !count_matches(&trailer.group_count, group_count) {
        findings.push(mismatch(rule, "IEA", 1, &trailer.group_count));
    }
    if trailer.control_number != interchange.control_number {
        findings.push(mismatch(rule, "IEA", 2, &trailer.control_number));
    }
    findings
}

fn missing(rule: &ValidationRule, segment_id: &str) -> Vec<ValidationError> {
    if rule.required {
        vec![finding(rule, segment_id)]
    } else {
        Vec::new()
    }
}
