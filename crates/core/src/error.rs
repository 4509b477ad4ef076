//! Error types for the processing core.

use datacleanse_ledger::StoreError;
use datacleanse_sheet::SheetError;
use thiserror::Error;

/// Result type for processing operations.
pub type CleanseResult<T> = Result<T, CleanseError>;

/// Errors that can occur while cleaning a workbook.
#[derive(Debug, Error)]
pub enum CleanseError {
    /// The input artifact could not be read as a workbook. Fatal to the
    /// run; raised before any ledger mutation.
    #[error("Input format error: {0}")]
    InputFormat(String),

    /// Sheet manipulation error while rewriting the workbook.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Ledger read/write failure. Fatal to the run; the batch commit
    /// guarantees no partial counts were persisted.
    #[error("Ledger error: {0}")]
    Store(#[from] StoreError),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
