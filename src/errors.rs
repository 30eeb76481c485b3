use thiserror::Error;

use crate::ledger::TransactionKind;

/// Error type that captures classification and lookup failures on the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{kind} `{name}` already exists")]
    AlreadyExists { kind: &'static str, name: String },
    #[error("{kind} `{name}` does not exist")]
    NotFound { kind: &'static str, name: String },
    #[error("the Uncategorised {kind} is protected and cannot be added or removed")]
    Protected { kind: &'static str },
    #[error("there are no {0} entries to list")]
    NothingToList(TransactionKind),
    #[error("there are no entries to list")]
    NothingRecorded,
    #[error("there are no {0} entries to summarize")]
    NothingToSummarize(TransactionKind),
}

/// Error type raised by the persistence and export layers.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
