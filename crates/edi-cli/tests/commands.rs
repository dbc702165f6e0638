//! Subcommands run end to end against a temporary store directory.

use std::fs;
use std::path::{Path, PathBuf};

use edi_cli::cli::{
    ParseArgs, ShowArgs, StatusArgs, StoreArgs, SubmitArgs, ValidateArgs,
};
use edi_cli::commands::{run_parse, run_show, run_status, run_submit, run_validate};
use edi_cli::config::EdiConfig;
use edi_model::{TransactionStatus, TransactionType};
use edi_submit::{LifecycleError, SubmissionStatus};

const CLAIM: &[u8] = b"ISA*00*          *00*          *ZZ*SENDERID       *ZZ*RECEIVERID     \
*240101*1200*^*00501*000000042*0*P*:~\n\
GS*HC*SENDERID*RECEIVERID*20240101*1200*42*X*005010X222A1~\n\
ST*837*0001*005010X222A1~\n\
NM1*85*2*BILLING PROVIDER*****XX*1234567893~\n\
REF*EA*\xFF\xFE~\n\
CLM*PATIENT1*100***11:B:1*Y*A*Y*Y~\n\
SE*4*0001~\n\
GE*1*42~\n\
IEA*1*000000042~\n";

fn store_args(dir: &Path) -> StoreArgs {
    StoreArgs {
        store_dir: Some(dir.to_path_buf()),
    }
}

fn status_args(dir: &Path, id: &str, status: &str, response: Option<PathBuf>) -> StatusArgs {
    StatusArgs {
        transaction_id: id.to_string(),
        status: status.to_string(),
        error_code: None,
        error_message: None,
        response_id: response.as_ref().map(|_| "RESP-1".to_string()),
        response_file: response,
        store: store_args(dir),
    }
}

#[test]
fn test_submit_status_show() {
    let dir = tempfile::tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let file = dir.path().join("claim.x12");
    fs::write(&file, CLAIM).unwrap();
    let config = EdiConfig::default();

    let parsed = run_parse(
        &ParseArgs {
            file: file.clone(),
            json: false,
        },
        &config,
    )
    .unwrap();
    assert_eq!(parsed.segment_count(), 8);
    assert_eq!(parsed.segment_errors.len(), 1);

    let findings = run_validate(
        &ValidateArgs {
            file: file.clone(),
            rules: None,
            json: false,
        },
        &config,
    )
    .unwrap();
    assert!(findings.is_empty(), "{findings:?}");

    let outcome = run_submit(
        &SubmitArgs {
            file,
            transaction_type: TransactionType::ClaimProfessional,
            provider: Some("PRV-1".into()),
            claim: None,
            patient: None,
            rules: None,
            store: store_args(&store_dir),
            json: false,
        },
        &config,
    )
    .unwrap();
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.result.status, Some(SubmissionStatus::Accepted));
    assert_eq!(outcome.result.warnings.len(), 1);
    let id = outcome.result.transaction_id.unwrap();

    let response = dir.path().join("response.x12");
    fs::write(
        &response,
        "ISA*00*          *00*          *ZZ*RECEIVERID     *ZZ*SENDERID       \
         *240102*0900*^*00501*000000777*0*P*:\nIEA*0*000000777\n",
    )
    .unwrap();
    let accepted = run_status(&status_args(&store_dir, &id, "accepted", Some(response)), &config)
        .unwrap();
    assert_eq!(accepted.status, TransactionStatus::Accepted);

    let shown = run_show(
        &ShowArgs {
            transaction_id: id.clone(),
            store: store_args(&store_dir),
        },
        &config,
    )
    .unwrap();
    assert_eq!(shown.status, TransactionStatus::Accepted);
    assert_eq!(shown.provider_ref.as_deref(), Some("PRV-1"));
    assert!(!shown.has_validation_errors());
    assert_eq!(shown.response_transaction_id.as_deref(), Some("RESP-1"));
    assert!(shown.response_received_at.is_some());
    assert_eq!(
        shown
            .response_parsed_document
            .as_ref()
            .map(|document| document.interchange.control_number.as_str()),
        Some("000000777")
    );

    let error = run_status(&status_args(&store_dir, &id, "REJECTED", None), &config).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::InvalidTransition { .. })
    ));
}
