pub mod csv_backend;
pub mod export;

use crate::{errors::StorageError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of a load that tolerated malformed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub(crate) fn skip(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.skipped += 1;
        self.warnings.push(message);
    }

    pub(crate) fn note(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Abstraction over persistence backends that can populate and dump a ledger.
pub trait StorageBackend {
    fn load(&self) -> Result<(Ledger, LoadReport)>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

pub use csv_backend::CsvStorage;
pub use export::{export_transactions, ExportSelection};
