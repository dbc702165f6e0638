pub mod enums;
pub mod envelope;
pub mod error;
pub mod issue;
pub mod rule;
pub mod segment;
pub mod transaction;

pub use enums::{TransactionStatus, TransactionType};
pub use envelope::{
    FunctionalGroup, GroupTrailer, Interchange, InterchangeTrailer, ParsedDocument,
    TransactionSet, TransactionTrailer,
};
pub use error::{ModelError, Result};
pub use issue::ValidationError;
pub use rule::{RuleType, ValidationRule};
pub use segment::{Element, Segment};
pub use transaction::EdiTransaction;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_rule_and_segment() {
        let rule = ValidationRule::new(
            "nm1-last-name",
            RuleType::RequiredElement,
            "NM1",
            "E200",
            "Last name is required",
        )
        .at(3)
        .required();
        let segment = Segment::new("NM1", vec![Element::from("IL")], "NM1*IL");
        let error = ValidationError::from_rule(&rule)
            .with_element(segment.designator(3), "")
            .in_segment(&segment);
        assert_eq!(error.code, "E200");
        assert_eq!(error.element.as_deref(), Some("NM103"));
        assert_eq!(error.segment.as_deref(), Some("NM1"));
        assert_eq!(error.segment_raw.as_deref(), Some("NM1*IL"));
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&TransactionStatus::Accepted).expect("serialize status");
        assert_eq!(json, "\"ACCEPTED\"");
        let rule_type = serde_json::to_string(&RuleType::CrossReference).expect("serialize rule type");
        assert_eq!(rule_type, "\"CROSS_REFERENCE\"");
    }
}
