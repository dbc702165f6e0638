use serde::Serialize;
use thiserror::Error;

/// Why a single segment could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentErrorKind {
    #[error("invalid UTF-8 after byte {valid_up_to}")]
    InvalidEncoding { valid_up_to: usize },
    #[error("missing segment identifier")]
    MissingSegmentId,
    #[error("invalid segment identifier '{id}'")]
    InvalidSegmentId { id: String },
}

/// A segment that was skipped during tokenization.
///
/// Recorded alongside the segments that did tokenize; never fatal on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("segment {index}: {kind}")]
pub struct SegmentError {
    /// 1-based position among the non-blank segments of the input.
    pub index: usize,
    pub raw: String,
    pub kind: SegmentErrorKind,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Nothing usable was left after skipping blank lines and failed segments.
    #[error("no segments found in input")]
    EmptyInput { errors: Vec<SegmentError> },
}

impl IngestError {
    /// Per-segment messages, or the error itself when there were none.
    pub fn messages(&self) -> Vec<String> {
        match self {
            IngestError::EmptyInput { errors } if !errors.is_empty() => {
                errors.iter().map(ToString::to_string).collect()
            }
            IngestError::EmptyInput { .. } => vec![self.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
