//! Error types for stores, status transitions and submissions.

use std::path::PathBuf;

use edi_model::TransactionStatus;
use thiserror::Error;

/// Transaction store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// A record with the same id already exists.
    #[error("transaction already exists: {0}")]
    Conflict(String),

    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize transaction {id}")]
    Serialization {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("transaction store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Rejected or failed status change.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid status '{value}': expected ACCEPTED, REJECTED or ERROR")]
    InvalidStatus { value: String },

    #[error("cannot move transaction from {from} to {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure inside the submission pipeline. Folded into a
/// [`SubmissionOutcome`](crate::SubmissionOutcome) before it leaves the crate.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Ingest(#[from] edi_ingest::IngestError),

    #[error("failed to load validation rules: {0}")]
    Rules(#[from] edi_validate::RuleLoadError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not allocate a unique transaction id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type Result<T> = std::result::Result<T, LifecycleError>;
