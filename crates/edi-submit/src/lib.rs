//! Submission and lifecycle tracking for EDI transactions.
//!
//! [`Submitter`] runs the pipeline (pre-check, tokenize, build, validate,
//! persist) and reports a [`SubmissionOutcome`]. [`TransactionManager`]
//! applies explicit status updates afterwards. Both work against any
//! [`TransactionStore`].

pub mod error;
pub mod id;
pub mod lifecycle;
pub mod store;
pub mod submitter;

pub use error::{LifecycleError, Result, StoreError, StoreResult, SubmitError};
pub use id::generate_transaction_id;
pub use lifecycle::{
    StatusUpdate, TransactionManager, VALIDATION_FAILED, apply_status_update, mark_error,
    mark_sent, parse_requested_status,
};
pub use store::{JsonFileStore, MemoryStore, TransactionStore, UpdateFn};
pub use submitter::{
    INVALID_CONTENT_MESSAGE, PROCESSING_FAILED_MESSAGE, SubmissionOutcome, SubmissionRequest,
    SubmissionResult, SubmissionStatus, Submitter, content_sha256,
};
