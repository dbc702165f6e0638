//! Integration tests for tokenizing and structuring complete interchanges.

use edi_ingest::{
    IngestError, StructureWarning, TokenizerOptions, looks_like_x12, parse, parse_with, tokenize,
};
use edi_model::Element;
use proptest::prelude::*;

const ISA: &str = "ISA*00*          *00*          *ZZ*SENDERID       *ZZ*RECEIVERID     \
                   *240101*1200*^*00501*000000001*0*P*:";

fn sample_837() -> String {
    [
        ISA,
        "GS*HC*SENDERID*RECEIVERID*20240101*1200*1*X*005010X222A1",
        "ST*837*0001*005010X222A1",
        "BHT*0019*00*0123*20240101*1200*CH",
        "NM1*41*2*SUBMITTER*****46*12345",
        "NM1*40*2*RECEIVER*****46*67890",
        "HL*1**20*1",
        "NM1*85*2*BILLING PROVIDER*****XX*1234567893",
        "CLM*PATIENT1*100***11:B:1*Y*A*Y*Y",
        "SV1*HC:99213*100*UN*1***1",
        "SE*9*0001",
        "GE*1*1",
        "IEA*1*000000001",
    ]
    .join("\n")
}

#[test]
fn test_sample_interchange_header() {
    let outcome = parse(&sample_837()).expect("parse sample");
    let interchange = &outcome.document.interchange;

    assert_eq!(interchange.sender_id, "SENDERID");
    assert_eq!(interchange.receiver_id, "RECEIVERID");
    assert_eq!(interchange.control_number, "000000001");
    assert_eq!(interchange.date, "240101");
    assert_eq!(interchange.version, "00501");
    assert!(interchange.is_production());
    assert_eq!(
        interchange.trailer.as_ref().map(|t| t.control_number.as_str()),
        Some("000000001")
    );
}

#[test]
fn test_sample_structure() {
    let outcome = parse(&sample_837()).expect("parse sample");

    assert_eq!(outcome.segment_count(), 13);
    assert!(outcome.segment_errors.is_empty());
    assert!(outcome.warnings.is_empty());

    let document = &outcome.document;
    assert_eq!(document.functional_groups.len(), 1);
    assert!(document.transactions.is_empty());

    let transaction = &document.functional_groups[0].transactions[0];
    assert_eq!(transaction.transaction_set_id, "837");
    assert_eq!(transaction.control_number, "0001");
    assert_eq!(transaction.implementation_reference, "005010X222A1");
    assert_eq!(transaction.segments.len(), 7);
    assert_eq!(transaction.expected_segment_count(), 9);

    let sv1 = &transaction.segments[6];
    assert_eq!(sv1.segment_id(), "SV1");
    assert_eq!(
        sv1.element(1),
        Some(&Element::Composite(vec!["HC".into(), "99213".into()]))
    );
}

#[test]
fn test_tilde_terminated_single_line() {
    let text = sample_837().replace('\n', "~");
    let outcome = parse(&text).expect("parse tilde-terminated");
    assert_eq!(outcome.segment_count(), 13);
    assert_eq!(outcome.document.interchange.sender_id, "SENDERID");

    let explicit = parse_with(&text, &TokenizerOptions::default().with_segment_terminator('~'))
        .expect("parse with explicit terminator");
    assert_eq!(explicit.segment_count(), 13);
}

#[test]
fn test_partial_structure_with_errors() {
    let text = sample_837().replace("HL*1**20*1", "HL*1**20*1\n#broken line");
    let outcome = parse(&text).expect("best-effort parse");
    assert_eq!(outcome.segment_count(), 13);
    assert_eq!(outcome.segment_errors.len(), 1);
    assert_eq!(outcome.segment_errors[0].raw, "#broken line");
}

#[test]
fn test_orphan_before_transaction() {
    let text = [ISA, "GS*HC", "REF*EA*X", "ST*837*0001", "SE*2*0001", "GE*1*1"].join("\n");
    let outcome = parse(&text).expect("parse");
    assert!(matches!(
        outcome.warnings.as_slice(),
        [StructureWarning::OrphanSegment { segment_id, .. }] if segment_id == "REF"
    ));
}

#[test]
fn test_blank_input() {
    assert!(matches!(
        tokenize("\r\n\r\n"),
        Err(IngestError::EmptyInput { .. })
    ));
    assert!(parse("   ").is_err());
    assert!(!looks_like_x12("   "));
}

fn element_strategy() -> impl Strategy<Value = Element> {
    prop_oneof![
        "[A-Z0-9 ]{0,6}".prop_map(Element::Simple),
        prop::collection::vec("[A-Z0-9]{0,4}", 2..4).prop_map(Element::Composite),
    ]
}

fn line_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{1,2}(\\*[A-Z0-9:]{0,6}){0,5}"
}

proptest! {
    #[test]
    fn prop_elements_and_composites(
        id in "[A-Z][A-Z0-9]{1,2}",
        elements in prop::collection::vec(element_strategy(), 0..6),
    ) {
        prop_assume!(id != "ISA");
        let mut line = id.clone();
        for element in &elements {
            line.push('*');
            line.push_str(&element.as_text());
        }
        let tokenized = tokenize(&line).unwrap();
        prop_assert_eq!(tokenized.segments.len(), 1);
        prop_assert_eq!(tokenized.segments[0].segment_id(), id.as_str());
        prop_assert_eq!(tokenized.segments[0].elements(), elements.as_slice());
    }

    #[test]
    fn prop_rejoin_reproduces_content(
        lines in prop::collection::vec((line_strategy(), any::<bool>()), 1..20),
    ) {
        let mut text = String::new();
        for (line, blank_after) in &lines {
            text.push_str(line);
            text.push_str(if *blank_after { "\r\n  \r\n" } else { "\n" });
        }
        let expected = lines
            .iter()
            .map(|(line, _)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let tokenized = tokenize(&text).unwrap();
        prop_assert_eq!(tokenized.rejoin("\n"), expected);
    }

    #[test]
    fn prop_isa_led_segment_count(
        lines in prop::collection::vec("[B-Z][A-Z0-9]{1,2}(\\*[A-Z0-9]{0,6}){0,5}", 0..30),
    ) {
        let mut all = vec![ISA.to_string()];
        all.extend(lines);
        let outcome = parse(&all.join("\n")).unwrap();
        prop_assert_eq!(outcome.segment_count(), all.len());
        prop_assert!(!outcome.document.interchange.is_empty());
    }
}
