//! Validation of complete interchanges against the built-in and file-based rules.

use edi_ingest::parse;
use edi_model::{ParsedDocument, RuleType, ValidationRule};
use edi_validate::{
    RuleLoadError, RuleSource, default_rules, load_rules, load_rules_csv, validate,
};

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

fn document(text: &str) -> ParsedDocument {
    parse(text).expect("parse").document
}

fn default_active() -> Vec<ValidationRule> {
    default_rules().unwrap().active_rules().unwrap()
}

fn codes(findings: &[edi_model::ValidationError]) -> Vec<&str> {
    findings.iter().map(|f| f.code.as_str()).collect()
}

#[test]
fn test_sample_passes_default_rules() {
    let findings = validate(&document(&sample_837()), &default_active());
    assert!(findings.is_empty(), "unexpected findings: {findings:#?}");
}

#[test]
fn test_findings_follow_document_order() {
    let text = sample_837()
        .replace("*0*P*:", "*0*X*:")
        .replace("GS*HC*", "GS*ZZ*")
        .replace("NM1*40*2*", "NM1*40*3*")
        .replace("CLM*PATIENT1*100*", "CLM*PATIENT1*abc*")
        .replace("SE*9*0001", "SE*8*0001");
    let findings = validate(&document(&text), &default_active());
    assert_eq!(
        codes(&findings),
        ["ISA006", "GS001", "NM1002", "CLM002", "SE001"]
    );

    let nm1 = &findings[2];
    assert_eq!(nm1.element.as_deref(), Some("NM102"));
    assert_eq!(nm1.value.as_deref(), Some("3"));
    assert_eq!(nm1.segment_raw.as_deref(), Some("NM1*40*3*RECEIVER*****46*67890"));
    assert_eq!(findings[4].element.as_deref(), Some("SE01"));
}

#[test]
fn test_missing_envelope_segments() {
    let text = [ISA, "ST*837*0001", "NM1*41*2*SUBMITTER", "SE*3*0001"].join("\n");
    let findings = validate(&document(&text), &default_active());
    assert_eq!(codes(&findings), ["GS000", "IEA001"]);
}

#[test]
fn test_required_empty_element_single_finding() {
    let rules = vec![
        ValidationRule::new("nm103", RuleType::FormatValidation, "NM1", "N3", "name")
            .at(3)
            .required()
            .with_length(Some(2), Some(10))
            .with_codes(["SMITH"])
            .with_pattern("[A-Z]+"),
    ];
    let text = sample_837().replace("NM1*85*2*BILLING PROVIDER*", "NM1*85*2**");
    let findings = validate(&document(&text), &rules);
    assert_eq!(findings.len(), 3);
    // The two populated NM1s fail the code list; the empty one short-circuits.
    assert_eq!(findings[2].value.as_deref(), Some(""));
    assert_eq!(
        findings[2].segment_raw.as_deref(),
        Some("NM1*85*2******XX*1234567893")
    );
}

#[test]
fn test_position_beyond_elements_never_fires() {
    let rules = vec![
        ValidationRule::new("hl-far", RuleType::RequiredElement, "HL", "H9", "far")
            .at(12)
            .required(),
    ];
    assert!(validate(&document(&sample_837()), &rules).is_empty());
}

#[test]
fn test_inactive_and_empty_rule_sets() {
    let rules: Vec<_> = default_rules()
        .unwrap()
        .into_rules()
        .into_iter()
        .map(ValidationRule::inactive)
        .collect();
    let text = sample_837().replace("GS*HC*", "GS*ZZ*");
    assert!(validate(&document(&text), &rules).is_empty());
    assert!(validate(&document(&text), &[]).is_empty());
}

#[test]
fn test_load_rules_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let rules = default_rules().unwrap().into_rules();

    let json_path = dir.path().join("rules.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&rules).unwrap()).unwrap();
    let from_json = load_rules(&json_path).unwrap();
    assert_eq!(from_json.into_rules(), rules);

    let csv_path = dir.path().join("rules.csv");
    std::fs::write(&csv_path, include_str!("../rules/default_rules.csv")).unwrap();
    assert_eq!(load_rules_csv(&csv_path).unwrap().into_rules(), rules);

    let missing = dir.path().join("absent.csv");
    assert!(matches!(load_rules(&missing), Err(RuleLoadError::Io { .. })));
}

#[test]
fn test_duplicate_names_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    std::fs::write(
        &path,
        "name,rule_type,segment_id,error_code,error_message\n\
         a,REQUIRED_SEGMENT,BHT,B1,missing\n\
         a,REQUIRED_SEGMENT,REF,R1,missing\n",
    )
    .unwrap();
    assert!(matches!(
        load_rules(&path),
        Err(RuleLoadError::DuplicateName(name)) if name == "a"
    ));
}

#[test]
fn test_transaction_header_rules_fire_per_transaction() {
    let text = sample_837()
        .replace("ST*837*0001*", "ST*837*01*")
        .replace("SE*9*0001", "SE*9*01");
    let findings = validate(&document(&text), &default_active());
    assert_eq!(codes(&findings), ["ST001"]);
    let finding = &findings[0];
    assert_eq!(finding.element.as_deref(), Some("ST02"));
    assert_eq!(finding.value.as_deref(), Some("01"));
    assert_eq!(finding.segment_raw.as_deref(), Some("ST*837*01*005010X222A1"));

    let rules = [ValidationRule::new(
        "st-id",
        RuleType::CodeValidation,
        "ST",
        "ST100",
        "Unexpected transaction set",
    )
    .at(1)
    .with_codes(["835"])];
    let loose = "ST*837*0001\nBHT*0019\nSE*3*0001\nST*270*0002\nSE*2*0002";
    let findings = validate(&document(loose), &rules);
    let values: Vec<_> = findings.iter().filter_map(|f| f.value.as_deref()).collect();
    assert_eq!(values, ["837", "270"]);
}
