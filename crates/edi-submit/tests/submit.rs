//! End-to-end submissions against shared stores.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use edi_model::{TransactionStatus, TransactionType};
use edi_submit::{
    JsonFileStore, LifecycleError, MemoryStore, StatusUpdate, SubmissionRequest,
    SubmissionStatus, Submitter, TransactionManager, TransactionStore,
};
use edi_validate::default_rules;

fn interchange(control: u32, claim: &str) -> String {
    let control = format!("{control:09}");
    [
        format!(
            "ISA*00*          *00*          *ZZ*SENDERID       *ZZ*RECEIVERID     \
             *240101*1200*^*00501*{control}*0*P*:"
        ),
        "GS*HC*SENDERID*RECEIVERID*20240101*1200*1*X*005010X222A1".to_string(),
        "ST*837*0001*005010X222A1".to_string(),
        "NM1*85*2*BILLING PROVIDER*****XX*1234567893".to_string(),
        format!("CLM*{claim}*100***11:B:1*Y*A*Y*Y"),
        "SE*4*0001".to_string(),
        "GE*1*1".to_string(),
        format!("IEA*1*{control}"),
    ]
    .join("~\n")
        + "~"
}

fn default_submitter(store: Arc<dyn TransactionStore>) -> Submitter {
    Submitter::new(Arc::new(default_rules().unwrap()), store)
}

#[test]
fn test_concurrent_submissions_get_unique_ids() {
    let store = Arc::new(MemoryStore::new());
    let submitter = Arc::new(default_submitter(store.clone()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let submitter = Arc::clone(&submitter);
            thread::spawn(move || {
                (0..25)
                    .map(|n| {
                        let content = interchange(worker * 100 + n, &format!("P{worker}-{n}"));
                        let outcome = submitter.submit(SubmissionRequest::new(
                            content,
                            TransactionType::ClaimProfessional,
                        ));
                        assert!(outcome.ok, "{}", outcome.message);
                        outcome.result.transaction_id.unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate transaction id");
        }
    }
    assert_eq!(ids.len(), 200);
    assert_eq!(store.len(), 200);
}

#[test]
fn test_default_rules_accept_clean_interchange() {
    let store = Arc::new(MemoryStore::new());
    let outcome = default_submitter(store.clone()).submit(SubmissionRequest::new(
        interchange(1, "PATIENT1"),
        TransactionType::ClaimProfessional,
    ));
    assert!(outcome.ok);
    assert!(
        outcome.result.validation_errors.is_empty(),
        "{:#?}",
        outcome.result.validation_errors
    );
    assert_eq!(outcome.result.status, Some(SubmissionStatus::Accepted));
    assert_eq!(outcome.result.segment_count, 8);

    let parsed = outcome.result.parsed_data.unwrap();
    assert_eq!(parsed.interchange.sender_id, "SENDERID");
    assert_eq!(parsed.interchange.receiver_id, "RECEIVERID");
    assert_eq!(parsed.interchange.control_number, "000000001");
}

#[test]
fn test_file_store_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn TransactionStore> = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let submitter = default_submitter(Arc::clone(&store));
    let manager = TransactionManager::new(Arc::clone(&store));

    // Bad claim amount makes the submission land in ERROR.
    let content = interchange(2, "PATIENT2").replace("*100***", "*12.345***");
    let outcome = submitter.submit(SubmissionRequest::new(
        content,
        TransactionType::ClaimProfessional,
    ));
    assert!(outcome.ok);
    assert_eq!(
        outcome.result.status,
        Some(SubmissionStatus::AcceptedWithErrors)
    );
    let id = outcome.result.transaction_id.unwrap();
    assert_eq!(manager.get(&id).unwrap().status, TransactionStatus::Error);

    let err = manager
        .update_status(&id, &StatusUpdate::new("PAID"))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidStatus { .. }));
    assert_eq!(manager.get(&id).unwrap().status, TransactionStatus::Error);

    let accepted = manager
        .update_status(&id, &StatusUpdate::new("ACCEPTED"))
        .unwrap();
    assert_eq!(accepted.status, TransactionStatus::Accepted);
    assert!(accepted.response_received_at.is_some());

    let err = manager
        .update_status(&id, &StatusUpdate::new("REJECTED"))
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidTransition {
            from: TransactionStatus::Accepted,
            ..
        }
    ));

    let reopened = JsonFileStore::open(dir.path()).unwrap();
    let all = reopened.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, TransactionStatus::Accepted);
    assert_eq!(all[0].validation_errors.len(), 1);
}
