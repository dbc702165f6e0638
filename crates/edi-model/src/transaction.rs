//! Persisted record of one submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{TransactionStatus, TransactionType};
use crate::envelope::ParsedDocument;
use crate::issue::ValidationError;

/// One submitted EDI transaction and its lifecycle state.
///
/// Created once per submission. Status changes go through the lifecycle
/// manager; records are never deleted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdiTransaction {
    pub transaction_id: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub sender_id: String,
    pub receiver_id: String,
    pub provider_ref: Option<String>,
    pub claim_ref: Option<String>,
    pub patient_ref: Option<String>,
    pub raw_content: String,
    /// Hex SHA-256 of `raw_content`.
    pub content_sha256: String,
    pub parsed_document: ParsedDocument,
    pub segment_count: usize,
    /// `ISA13` of the submitted interchange.
    pub control_number: String,
    pub response_transaction_id: Option<String>,
    pub response_content: Option<String>,
    pub response_parsed_document: Option<ParsedDocument>,
    pub response_received_at: Option<DateTime<Utc>>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<ValidationError>,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl EdiTransaction {
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }
}
