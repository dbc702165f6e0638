use std::path::PathBuf;

use thiserror::Error;

/// Error loading or serving validation rules.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV rules: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON rules: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("invalid value for {column} on line {line}: {message}")]
    InvalidValue {
        line: u64,
        column: String,
        message: String,
    },

    #[error("duplicate rule name: {0}")]
    DuplicateName(String),

    #[error("unsupported rules file format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl RuleLoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleLoadError>;
