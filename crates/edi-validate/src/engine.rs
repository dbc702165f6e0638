//! Rule engine: walks a parsed document and applies the indexed rules.

use edi_model::{
    FunctionalGroup, ParsedDocument, Segment, TransactionSet, ValidationError, ValidationRule,
};

use crate::checks::{element, envelope, presence};
use crate::index::RuleIndex;

/// Interchange-level segment ids whose presence is checked once per document.
const INTERCHANGE_PRESENCE: [&str; 4] = ["ISA", "IEA", "GS", "ST"];

/// Applies a fixed rule set to parsed documents.
///
/// Findings come out in a stable order: interchange rules, then group header
/// rules for each group, then each transaction set (grouped ones first, then
/// ungrouped), and within a transaction its segments in document order with
/// their rules in configuration order.
#[derive(Debug)]
pub struct RuleEngine<'a> {
    index: RuleIndex<'a>,
}

impl<'a> RuleEngine<'a> {
    /// Index the active rules once for the run.
    pub fn new(rules: &'a [ValidationRule]) -> Self {
        Self {
            index: RuleIndex::new(rules),
        }
    }

    /// Validate a document. Findings are returned, never raised.
    pub fn validate(&self, document: &ParsedDocument) -> Vec<ValidationError> {
        let mut findings = Vec::new();
        if self.index.is_empty() {
            return findings;
        }

        self.validate_interchange(document, &mut findings);
        for group in &document.functional_groups {
            self.validate_group(group, &mut findings);
        }
        for transaction in document.all_transactions() {
            self.validate_transaction(transaction, &mut findings);
        }

        tracing::debug!(
            groups = document.functional_groups.len(),
            transactions = document.transaction_count(),
            findings = findings.len(),
            "validated document"
        );
        findings
    }

    fn validate_interchange(&self, document: &ParsedDocument, findings: &mut Vec<ValidationError>) {
        for segment_id in INTERCHANGE_PRESENCE {
            findings.extend(
                self.index
                    .presence_rules_for(segment_id)
                    .filter_map(|rule| presence::check_envelope(rule, document)),
            );
        }

        if let Some(header) = &document.interchange.header {
            self.check_segment(header, findings);
        }

        for rule in self.index.envelope_rules_for("IEA") {
            findings.extend(envelope::check_interchange(
                rule,
                &document.interchange,
                document.functional_groups.len(),
            ));
        }
    }

    fn validate_group(&self, group: &FunctionalGroup, findings: &mut Vec<ValidationError>) {
        if let Some(header) = &group.header {
            self.check_segment(header, findings);
        }
        findings.extend(
            self.index
                .presence_rules_for("GE")
                .filter_map(|rule| presence::check_group_trailer(rule, group)),
        );
        for rule in self.index.envelope_rules_for("GE") {
            findings.extend(envelope::check_group(rule, group));
        }
    }

    fn validate_transaction(&self, transaction: &TransactionSet, findings: &mut Vec<ValidationError>) {
        if let Some(header) = &transaction.header {
            self.check_segment(header, findings);
        }
        for segment in &transaction.segments {
            self.check_segment(segment, findings);
        }

        findings.extend(
            self.index
                .data_presence_rules()
                .filter_map(|rule| presence::check_transaction(rule, transaction)),
        );
        findings.extend(
            self.index
                .presence_rules_for("SE")
                .filter_map(|rule| presence::check_transaction_trailer(rule, transaction)),
        );
        for rule in self.index.envelope_rules_for("SE") {
            findings.extend(envelope::check_transaction(rule, transaction));
        }
    }

    fn check_segment(&self, segment: &Segment, findings: &mut Vec<ValidationError>) {
        for compiled in self.index.element_rules(segment.segment_id()) {
            findings.extend(element::check(compiled, segment));
        }
    }
}
