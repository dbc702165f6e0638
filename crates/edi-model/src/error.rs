use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown transaction type: {0}")]
    UnknownTransactionType(String),
    #[error("unknown transaction status: {0}")]
    UnknownStatus(String),
    #[error("unknown rule type: {0}")]
    UnknownRuleType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
