//! Hierarchy builder.
//!
//! Assembles a flat segment list into interchange → functional group →
//! transaction set → data segments in one left-to-right pass.

use edi_model::{
    FunctionalGroup, GroupTrailer, Interchange, InterchangeTrailer, ParsedDocument, Segment,
    TransactionSet, TransactionTrailer,
};
use serde::Serialize;

/// Structural oddity found while building. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureWarning {
    /// Data segment seen while no transaction set was open; not kept in the tree.
    OrphanSegment {
        position: usize,
        segment_id: String,
        raw: String,
    },
    /// `SE`/`GE`/`IEA` with no matching header open.
    UnmatchedTrailer { position: usize, segment_id: String },
    /// A second `ISA` replaced the interchange header.
    RepeatedInterchange { position: usize },
}

impl StructureWarning {
    pub fn message(&self) -> String {
        match self {
            Self::OrphanSegment {
                position,
                segment_id,
                ..
            } => format!(
                "segment {position} ({segment_id}) appears outside any transaction set and was dropped"
            ),
            Self::UnmatchedTrailer {
                position,
                segment_id,
            } => format!("segment {position} ({segment_id}) has no matching header"),
            Self::RepeatedInterchange { position } => {
                format!("segment {position} (ISA) replaces an earlier interchange header")
            }
        }
    }
}

/// Output of [`build_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    pub document: ParsedDocument,
    pub warnings: Vec<StructureWarning>,
}

#[derive(Debug, Clone, Copy)]
enum OpenTransaction {
    Grouped { group: usize, transaction: usize },
    Loose { transaction: usize },
}

/// Build the envelope tree.
///
/// `SE`, `GE` and `IEA` attach trailers without closing anything: segments
/// after an `SE` still land in that transaction until the next `ST` or `GS`.
pub fn build_document(segments: &[Segment]) -> Hierarchy {
    let mut document = ParsedDocument::default();
    let mut warnings = Vec::new();
    let mut current_group: Option<usize> = None;
    let mut current_transaction: Option<OpenTransaction> = None;

    for (offset, segment) in segments.iter().enumerate() {
        let position = offset + 1;
        match segment.segment_id() {
            "ISA" => {
                if !document.interchange.is_empty() {
                    warnings.push(StructureWarning::RepeatedInterchange { position });
                }
                let trailer = document.interchange.trailer.take();
                document.interchange = parse_interchange(segment);
                document.interchange.trailer = trailer;
            }
            "GS" => {
                document.functional_groups.push(parse_group(segment));
                current_group = Some(document.functional_groups.len() - 1);
                current_transaction = None;
            }
            "ST" => {
                let transaction = parse_transaction(segment);
                current_transaction = Some(match current_group {
                    Some(group) => {
                        let transactions = &mut document.functional_groups[group].transactions;
                        transactions.push(transaction);
                        OpenTransaction::Grouped {
                            group,
                            transaction: transactions.len() - 1,
                        }
                    }
                    None => {
                        document.transactions.push(transaction);
                        OpenTransaction::Loose {
                            transaction: document.transactions.len() - 1,
                        }
                    }
                });
            }
            "SE" => match transaction_mut(&mut document, current_transaction) {
                Some(transaction) => {
                    transaction.trailer = Some(TransactionTrailer {
                        segment_count: segment.field(1),
                        control_number: segment.field(2),
                    });
                }
                None => warnings.push(unmatched(position, segment)),
            },
            "GE" => match current_group {
                Some(group) => {
                    document.functional_groups[group].trailer = Some(GroupTrailer {
                        transaction_count: segment.field(1),
                        control_number: segment.field(2),
                    });
                }
                None => warnings.push(unmatched(position, segment)),
            },
            "IEA" => {
                if document.interchange.is_empty() {
                    warnings.push(unmatched(position, segment));
                }
                document.interchange.trailer = Some(InterchangeTrailer {
                    group_count: segment.field(1),
                    control_number: segment.field(2),
                });
            }
            _ => match transaction_mut(&mut document, current_transaction) {
                Some(transaction) => transaction.segments.push(segment.clone()),
                None => {
                    tracing::warn!(
                        position,
                        segment_id = segment.segment_id(),
                        "dropping segment outside any transaction set"
                    );
                    warnings.push(StructureWarning::OrphanSegment {
                        position,
                        segment_id: segment.segment_id().to_string(),
                        raw: segment.raw().to_string(),
                    });
                }
            },
        }
    }

    tracing::debug!(
        groups = document.functional_groups.len(),
        transactions = document.transaction_count(),
        warnings = warnings.len(),
        "built document hierarchy"
    );
    Hierarchy { document, warnings }
}

fn transaction_mut(
    document: &mut ParsedDocument,
    open: Option<OpenTransaction>,
) -> Option<&mut TransactionSet> {
    match open? {
        OpenTransaction::Grouped { group, transaction } => document
            .functional_groups
            .get_mut(group)?
            .transactions
            .get_mut(transaction),
        OpenTransaction::Loose { transaction } => document.transactions.get_mut(transaction),
    }
}

fn unmatched(position: usize, segment: &Segment) -> StructureWarning {
    StructureWarning::UnmatchedTrailer {
        position,
        segment_id: segment.segment_id().to_string(),
    }
}

/// `ISA01`..`ISA15`. `ISA16` (component separator) is not mapped.
pub fn parse_interchange(segment: &Segment) -> Interchange {
    Interchange {
        authorization_qualifier: segment.field(1),
        authorization_info: segment.field(2),
        security_qualifier: segment.field(3),
        security_info: segment.field(4),
        sender_qualifier: segment.field(5),
        sender_id: segment.field(6),
        receiver_qualifier: segment.field(7),
        receiver_id: segment.field(8),
        date: segment.field(9),
        time: segment.field(10),
        repetition_separator: segment.field(11),
        version: segment.field(12),
        control_number: segment.field(13),
        acknowledgment_requested: segment.field(14),
        usage_indicator: segment.field(15),
        header: Some(segment.clone()),
        trailer: None,
    }
}

pub fn parse_group(segment: &Segment) -> FunctionalGroup {
    FunctionalGroup {
        functional_id_code: segment.field(1),
        application_sender: segment.field(2),
        application_receiver: segment.field(3),
        date: segment.field(4),
        time: segment.field(5),
        control_number: segment.field(6),
        responsible_agency: segment.field(7),
        version: segment.field(8),
        header: Some(segment.clone()),
        transactions: Vec::new(),
        trailer: None,
    }
}

pub fn parse_transaction(segment: &Segment) -> TransactionSet {
    TransactionSet {
        transaction_set_id: segment.field(1),
        control_number: segment.field(2),
        implementation_reference: segment.field(3),
        header: Some(segment.clone()),
        segments: Vec::new(),
        trailer: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn build(text: &str) -> Hierarchy {
        build_document(&tokenize(text).unwrap().segments)
    }

    #[test]
    fn groups_own_their_transactions() {
        let hierarchy = build(
            "GS*HC*S*R*20240101*1200*1*X*005010X222A1\nST*837*0001\nBHT*0019\nSE*3*0001\nGE*1*1",
        );
        let document = &hierarchy.document;
        assert_eq!(document.functional_groups.len(), 1);
        assert!(document.transactions.is_empty());
        let group = &document.functional_groups[0];
        assert_eq!(group.functional_id_code, "HC");
        assert_eq!(group.version, "005010X222A1");
        assert_eq!(group.trailer.as_ref().unwrap().transaction_count, "1");
        let transaction = &group.transactions[0];
        assert_eq!(transaction.transaction_set_id, "837");
        assert_eq!(transaction.segments.len(), 1);
        assert_eq!(transaction.trailer.as_ref().unwrap().segment_count, "3");
        assert!(hierarchy.warnings.is_empty());
    }

    #[test]
    fn loose_transactions_go_to_the_document() {
        let hierarchy = build("ST*270*0001\nBHT*0022\nSE*3*0001");
        assert_eq!(hierarchy.document.transactions.len(), 1);
        assert_eq!(hierarchy.document.transactions[0].segments.len(), 1);
    }

    #[test]
    fn segments_after_se_stay_in_the_transaction() {
        let hierarchy = build("ST*837*0001\nSE*2*0001\nREF*EA*1");
        assert_eq!(hierarchy.document.transactions[0].segments.len(), 1);
    }

    #[test]
    fn orphan_segments_become_warnings() {
        let hierarchy = build("GS*HC\nNM1*85*2\nST*837*0001\nSE*2*0001");
        assert_eq!(hierarchy.document.data_segment_count(), 0);
        assert_eq!(
            hierarchy.warnings,
            vec![StructureWarning::OrphanSegment {
                position: 2,
                segment_id: "NM1".into(),
                raw: "NM1*85*2".into(),
            }]
        );
    }

    #[test]
    fn new_group_closes_the_open_transaction() {
        let hierarchy = build("GS*HC\nST*837*0001\nGS*HC\nCLM*1");
        assert_eq!(hierarchy.document.data_segment_count(), 0);
        assert_eq!(hierarchy.warnings.len(), 1);
    }

    #[test]
    fn unmatched_trailers_warn() {
        let hierarchy = build("SE*1*0001\nGE*0*1\nIEA*0*1");
        assert_eq!(hierarchy.warnings.len(), 3);
        assert!(hierarchy.document.interchange.trailer.is_some());
    }

    #[test]
    fn short_envelopes_default_to_empty_fields() {
        let hierarchy = build("ISA*00\nGS\nST*837");
        let interchange = &hierarchy.document.interchange;
        assert!(!interchange.is_empty());
        assert_eq!(interchange.authorization_qualifier, "00");
        assert_eq!(interchange.sender_id, "");
        assert_eq!(interchange.control_number, "");
        let group = &hierarchy.document.functional_groups[0];
        assert_eq!(group.control_number, "");
        assert_eq!(group.transactions[0].control_number, "");
    }
}
