//! Transaction status state machine.
//!
//! ```text
//! PENDING ──► SENT ──► ACCEPTED | REJECTED | ERROR
//!    │                   ▲
//!    └──► ERROR ─────────┘ (ACCEPTED | REJECTED | ERROR)
//! ```
//!
//! ACCEPTED and REJECTED are terminal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use edi_model::{EdiTransaction, TransactionStatus, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, Result};
use crate::store::TransactionStore;

/// Error code recorded when a submission fails validation.
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

/// Explicit status change requested for a sent transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Requested status as received; checked by [`parse_requested_status`].
    pub status: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
    #[serde(default)]
    pub response_transaction_id: Option<String>,
    /// Raw response payload, e.g. a 277 or 999.
    #[serde(default)]
    pub response_content: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_response(mut self, transaction_id: Option<String>, content: Option<String>) -> Self {
        self.response_transaction_id = transaction_id;
        self.response_content = content;
        self
    }
}

/// Parse an externally requested status. Only ACCEPTED, REJECTED and ERROR
/// may be requested, in any case.
pub fn parse_requested_status(value: &str) -> Result<TransactionStatus> {
    match value.trim().parse::<TransactionStatus>() {
        Ok(
            status @ (TransactionStatus::Accepted
            | TransactionStatus::Rejected
            | TransactionStatus::Error),
        ) => Ok(status),
        _ => Err(LifecycleError::InvalidStatus {
            value: value.to_string(),
        }),
    }
}

fn require_pending(tx: &EdiTransaction, to: TransactionStatus) -> Result<()> {
    if tx.status == TransactionStatus::Pending {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition { from: tx.status, to })
    }
}

/// PENDING → SENT after a clean validation.
pub fn mark_sent(tx: &mut EdiTransaction, now: DateTime<Utc>) -> Result<()> {
    require_pending(tx, TransactionStatus::Sent)?;
    tx.status = TransactionStatus::Sent;
    tx.processed_at = Some(now);
    Ok(())
}

/// PENDING → ERROR, recording the validation findings.
pub fn mark_error(
    tx: &mut EdiTransaction,
    errors: Vec<ValidationError>,
    now: DateTime<Utc>,
) -> Result<()> {
    require_pending(tx, TransactionStatus::Error)?;
    tx.status = TransactionStatus::Error;
    tx.error_code = Some(VALIDATION_FAILED.to_string());
    tx.error_message = Some(format!("{} validation error(s)", errors.len()));
    tx.validation_errors = errors;
    tx.processed_at = Some(now);
    Ok(())
}

/// Apply an explicit status update in place.
///
/// Only SENT and ERROR records accept updates. On error `tx` is untouched.
pub fn apply_status_update(
    tx: &mut EdiTransaction,
    update: &StatusUpdate,
    now: DateTime<Utc>,
) -> Result<()> {
    let target = parse_requested_status(&update.status)?;
    if !matches!(tx.status, TransactionStatus::Sent | TransactionStatus::Error) {
        return Err(LifecycleError::InvalidTransition {
            from: tx.status,
            to: target,
        });
    }

    tx.status = target;
    if target.is_terminal() {
        tx.response_received_at = Some(now);
    } else {
        tx.processed_at = Some(now);
    }

    if let Some(code) = &update.error_code {
        tx.error_code = Some(code.clone());
    }
    if let Some(message) = &update.error_message {
        tx.error_message = Some(message.clone());
    }
    if let Some(errors) = &update.validation_errors {
        tx.validation_errors = errors.clone();
    }
    if let Some(response_id) = &update.response_transaction_id {
        tx.response_transaction_id = Some(response_id.clone());
    }
    if let Some(content) = &update.response_content {
        tx.response_content = Some(content.clone());
        tx.response_parsed_document = match edi_ingest::parse(content) {
            Ok(outcome) => Some(outcome.document),
            Err(error) => {
                tracing::debug!(%error, "response content did not parse");
                None
            }
        };
    }
    Ok(())
}

/// Status updates against a store.
#[derive(Clone)]
pub struct TransactionManager {
    store: Arc<dyn TransactionStore>,
}

impl TransactionManager {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, transaction_id: &str) -> Result<EdiTransaction> {
        Ok(self.store.get(transaction_id)?)
    }

    /// Validate and apply an update as one store transaction.
    ///
    /// The requested status is checked before the store is touched; any
    /// failure leaves the stored record unchanged.
    #[tracing::instrument(skip(self, update), fields(status = %update.status))]
    pub fn update_status(
        &self,
        transaction_id: &str,
        update: &StatusUpdate,
    ) -> Result<EdiTransaction> {
        parse_requested_status(&update.status)?;
        let now = Utc::now();
        let updated = self
            .store
            .update(transaction_id, &mut |tx| apply_status_update(tx, update, now))?;
        tracing::info!(status = %updated.status, "transaction status updated");
        Ok(updated)
    }
}
