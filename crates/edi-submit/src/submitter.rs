//! Submission orchestrator: pre-check, parse, validate, persist.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use edi_ingest::{ParseOutcome, TokenizerOptions, looks_like_x12};
use edi_model::{
    EdiTransaction, ParsedDocument, TransactionStatus, TransactionType, ValidationError,
};
use edi_validate::RuleSource;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{StoreError, SubmitError};
use crate::id::generate_transaction_id;
use crate::lifecycle::{mark_error, mark_sent};
use crate::store::TransactionStore;

pub const INVALID_CONTENT_MESSAGE: &str = "Invalid EDI content: must start with ISA segment";
pub const PROCESSING_FAILED_MESSAGE: &str = "Error processing EDI transaction";
const ACCEPTED_MESSAGE: &str = "EDI transaction submitted successfully";
const ACCEPTED_WITH_ERRORS_MESSAGE: &str = "EDI transaction submitted with validation errors";
const DEFAULT_ID_ATTEMPTS: usize = 5;

/// One payload to submit, with the caller's opaque context references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub raw_content: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub provider_ref: Option<String>,
    #[serde(default)]
    pub claim_ref: Option<String>,
    #[serde(default)]
    pub patient_ref: Option<String>,
    /// Original bytes when built with [`from_bytes`](Self::from_bytes).
    #[serde(skip)]
    raw_bytes: Option<Vec<u8>>,
}

impl SubmissionRequest {
    pub fn new(raw_content: impl Into<String>, transaction_type: TransactionType) -> Self {
        Self {
            raw_content: raw_content.into(),
            transaction_type,
            provider_ref: None,
            claim_ref: None,
            patient_ref: None,
            raw_bytes: None,
        }
    }

    /// Request for content read from disk or the wire. Invalid UTF-8 fails
    /// only the segments it appears in; `raw_content` keeps a lossy copy.
    pub fn from_bytes(bytes: Vec<u8>, transaction_type: TransactionType) -> Self {
        Self {
            raw_content: String::from_utf8_lossy(&bytes).into_owned(),
            raw_bytes: Some(bytes),
            ..Self::new(String::new(), transaction_type)
        }
    }

    fn content_bytes(&self) -> &[u8] {
        self.raw_bytes
            .as_deref()
            .unwrap_or(self.raw_content.as_bytes())
    }

    #[must_use]
    pub fn with_refs(
        mut self,
        provider_ref: Option<String>,
        claim_ref: Option<String>,
        patient_ref: Option<String>,
    ) -> Self {
        self.provider_ref = provider_ref;
        self.claim_ref = claim_ref;
        self.patient_ref = patient_ref;
        self
    }
}

/// Outcome reported for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Stored with no findings and marked SENT.
    Accepted,
    /// Stored with findings and marked ERROR.
    AcceptedWithErrors,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: Option<SubmissionStatus>,
    pub transaction_id: Option<String>,
    pub message: String,
    pub segment_count: usize,
    pub validation_errors: Vec<ValidationError>,
    /// Tokenizer and structure warnings; never change the status.
    pub warnings: Vec<String>,
    pub parsed_data: Option<ParsedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub ok: bool,
    pub message: String,
    pub result: SubmissionResult,
}

impl SubmissionOutcome {
    fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            ok: false,
            result: SubmissionResult {
                message: message.clone(),
                ..SubmissionResult::default()
            },
            message,
        }
    }
}

/// Hex SHA-256 of submitted content.
pub fn content_sha256(content: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(content.as_ref()))
}

/// Composes tokenizer, hierarchy builder, rule engine and store.
///
/// Holds no per-submission state; share it behind an `Arc`.
pub struct Submitter {
    rules: Arc<dyn RuleSource>,
    store: Arc<dyn TransactionStore>,
    tokenizer: Option<TokenizerOptions>,
    id_attempts: usize,
}

impl Submitter {
    pub fn new(rules: Arc<dyn RuleSource>, store: Arc<dyn TransactionStore>) -> Self {
        Self {
            rules,
            store,
            tokenizer: None,
            id_attempts: DEFAULT_ID_ATTEMPTS,
        }
    }

    /// Use fixed delimiters instead of reading them from each `ISA` header.
    #[must_use]
    pub fn with_tokenizer_options(mut self, options: TokenizerOptions) -> Self {
        self.tokenizer = Some(options);
        self
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    /// Run one submission. Never panics and never returns an error; failures
    /// are reported through `ok == false`.
    #[tracing::instrument(
        skip(self, request),
        fields(transaction_type = %request.transaction_type, bytes = request.raw_content.len())
    )]
    pub fn submit(&self, request: SubmissionRequest) -> SubmissionOutcome {
        if !looks_like_x12(&request.raw_content) {
            tracing::info!("rejected content without ISA header");
            return SubmissionOutcome::failed(INVALID_CONTENT_MESSAGE);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.process(&request))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(SubmitError::Ingest(error))) => {
                tracing::info!(%error, "content did not tokenize");
                SubmissionOutcome::failed(format!(
                    "Failed to parse EDI content: {}",
                    error.messages().join("; ")
                ))
            }
            Ok(Err(error)) => {
                tracing::error!(%error, "submission failed");
                SubmissionOutcome::failed(PROCESSING_FAILED_MESSAGE)
            }
            Err(_) => {
                tracing::error!("submission pipeline panicked");
                SubmissionOutcome::failed(PROCESSING_FAILED_MESSAGE)
            }
        }
    }

    fn process(&self, request: &SubmissionRequest) -> Result<SubmissionOutcome, SubmitError> {
        let raw = request.content_bytes();
        let options = self
            .tokenizer
            .unwrap_or_else(|| edi_ingest::detect_bytes(raw));
        let parsed = edi_ingest::parse_bytes_with(raw, &options)?;
        tracing::debug!(
            segments = parsed.segment_count(),
            segment_errors = parsed.segment_errors.len(),
            structure_warnings = parsed.warnings.len(),
            "parsed content"
        );

        let rules = self.rules.active_rules()?;
        let findings = edi_validate::validate(&parsed.document, &rules);
        tracing::debug!(rules = rules.len(), findings = findings.len(), "validated content");

        let record = self.insert_pending(request, &parsed)?;
        let now = Utc::now();
        let stored = if findings.is_empty() {
            self.store
                .update(&record.transaction_id, &mut |tx| mark_sent(tx, now))?
        } else {
            self.store.update(&record.transaction_id, &mut |tx| {
                mark_error(tx, findings.clone(), now)
            })?
        };

        let status = match stored.status {
            TransactionStatus::Sent => SubmissionStatus::Accepted,
            _ => SubmissionStatus::AcceptedWithErrors,
        };
        let message = match status {
            SubmissionStatus::Accepted => ACCEPTED_MESSAGE,
            SubmissionStatus::AcceptedWithErrors => ACCEPTED_WITH_ERRORS_MESSAGE,
        };
        tracing::info!(
            transaction_id = %stored.transaction_id,
            status = %stored.status,
            findings = findings.len(),
            "submission stored"
        );

        let warnings = parsed
            .segment_errors
            .iter()
            .map(ToString::to_string)
            .chain(parsed.warnings.iter().map(|warning| warning.message()))
            .collect();

        Ok(SubmissionOutcome {
            ok: true,
            message: message.to_string(),
            result: SubmissionResult {
                status: Some(status),
                transaction_id: Some(stored.transaction_id),
                message: message.to_string(),
                segment_count: parsed.segment_count(),
                validation_errors: findings,
                warnings,
                parsed_data: Some(parsed.document),
            },
        })
    }

    /// Build the PENDING record and insert it, regenerating the id on conflict.
    fn insert_pending(
        &self,
        request: &SubmissionRequest,
        parsed: &ParseOutcome,
    ) -> Result<EdiTransaction, SubmitError> {
        let interchange = &parsed.document.interchange;
        let now = Utc::now();
        let mut record = EdiTransaction {
            transaction_id: String::new(),
            transaction_type: request.transaction_type,
            status: TransactionStatus::Pending,
            sender_id: interchange.sender_id.clone(),
            receiver_id: interchange.receiver_id.clone(),
            provider_ref: request.provider_ref.clone(),
            claim_ref: request.claim_ref.clone(),
            patient_ref: request.patient_ref.clone(),
            raw_content: request.raw_content.clone(),
            content_sha256: content_sha256(request.content_bytes()),
            parsed_document: parsed.document.clone(),
            segment_count: parsed.segment_count(),
            control_number: interchange.control_number.clone(),
            response_transaction_id: None,
            response_content: None,
            response_parsed_document: None,
            response_received_at: None,
            error_code: None,
            error_message: None,
            validation_errors: Vec::new(),
            submitted_at: now,
            processed_at: None,
        };

        for attempt in 1..=self.id_attempts {
            record.transaction_id = generate_transaction_id(now);
            match self.store.insert(&record) {
                Ok(()) => return Ok(record),
                Err(StoreError::Conflict(id)) => {
                    tracing::warn!(transaction_id = %id, attempt, "transaction id collision");
                }
                Err(error) => return Err(error.into()),
            }
        }
        Err(SubmitError::IdExhausted {
            attempts: self.id_attempts,
        })
    }
}
