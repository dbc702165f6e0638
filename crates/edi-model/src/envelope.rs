//! Envelope structure of an X12 interchange.
//!
//! An interchange (`ISA`/`IEA`) wraps functional groups (`GS`/`GE`), which wrap
//! transaction sets (`ST`/`SE`). Transaction sets carry the data segments.
//! Header fields are kept as trimmed strings; a field missing from the input
//! is an empty string.

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// `ISA` interchange control header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interchange {
    pub authorization_qualifier: String,
    pub authorization_info: String,
    pub security_qualifier: String,
    pub security_info: String,
    pub sender_qualifier: String,
    pub sender_id: String,
    pub receiver_qualifier: String,
    pub receiver_id: String,
    pub date: String,
    pub time: String,
    pub repetition_separator: String,
    pub version: String,
    pub control_number: String,
    pub acknowledgment_requested: String,
    pub usage_indicator: String,
    /// The `ISA` segment the fields were read from.
    pub header: Option<Segment>,
    pub trailer: Option<InterchangeTrailer>,
}

impl Interchange {
    /// True when no `ISA` segment has been seen.
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
    }

    /// `P` for production, `T` for test data.
    pub fn is_production(&self) -> bool {
        self.usage_indicator == "P"
    }
}

/// `IEA` interchange control trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeTrailer {
    pub group_count: String,
    pub control_number: String,
}

/// `GS` functional group with its transaction sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalGroup {
    pub functional_id_code: String,
    pub application_sender: String,
    pub application_receiver: String,
    pub date: String,
    pub time: String,
    pub control_number: String,
    pub responsible_agency: String,
    pub version: String,
    pub header: Option<Segment>,
    pub transactions: Vec<TransactionSet>,
    pub trailer: Option<GroupTrailer>,
}

/// `GE` functional group trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTrailer {
    pub transaction_count: String,
    pub control_number: String,
}

/// `ST` transaction set with its data segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSet {
    pub transaction_set_id: String,
    pub control_number: String,
    pub implementation_reference: String,
    pub header: Option<Segment>,
    pub segments: Vec<Segment>,
    pub trailer: Option<TransactionTrailer>,
}

impl TransactionSet {
    /// Segment count an `SE01` should declare: data segments plus `ST` and `SE`.
    pub fn expected_segment_count(&self) -> usize {
        self.segments.len() + 2
    }

    pub fn is_closed(&self) -> bool {
        self.trailer.is_some()
    }
}

/// `SE` transaction set trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTrailer {
    pub segment_count: String,
    pub control_number: String,
}

/// A fully structured document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub interchange: Interchange,
    pub functional_groups: Vec<FunctionalGroup>,
    /// Transaction sets that appeared outside any functional group.
    pub transactions: Vec<TransactionSet>,
}

impl ParsedDocument {
    /// Every transaction set in document order: grouped ones first, in group
    /// order, then the ungrouped ones.
    pub fn all_transactions(&self) -> impl Iterator<Item = &TransactionSet> {
        self.functional_groups
            .iter()
            .flat_map(|group| group.transactions.iter())
            .chain(self.transactions.iter())
    }

    pub fn transaction_count(&self) -> usize {
        self.all_transactions().count()
    }

    /// Data segments across all transaction sets.
    pub fn data_segment_count(&self) -> usize {
        self.all_transactions().map(|tx| tx.segments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_transactions_lists_grouped_then_loose() {
        let document = ParsedDocument {
            interchange: Interchange::default(),
            functional_groups: vec![FunctionalGroup {
                transactions: vec![TransactionSet {
                    control_number: "0001".into(),
                    ..TransactionSet::default()
                }],
                ..FunctionalGroup::default()
            }],
            transactions: vec![TransactionSet {
                control_number: "0002".into(),
                ..TransactionSet::default()
            }],
        };
        let numbers: Vec<_> = document
            .all_transactions()
            .map(|tx| tx.control_number.as_str())
            .collect();
        assert_eq!(numbers, ["0001", "0002"]);
        assert_eq!(document.transaction_count(), 2);
    }

    #[test]
    fn empty_interchange() {
        assert!(Interchange::default().is_empty());
        assert!(!Interchange::default().is_production());
    }
}
