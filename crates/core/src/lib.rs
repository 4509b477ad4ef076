//! # datacleanse-core
//!
//! The deduplication/frequency-limiting engine: scans a workbook's cells
//! for phone-number candidates, classifies each against the intra-sheet
//! seen-set and the historical frequency ledger, rewrites the workbook
//! with only the kept rows, and aggregates run statistics.
//!
//! Processing is strictly sequential — classification order is
//! significant, so one run never parallelizes across candidates. The
//! ledger is read and written only from inside [`classify_book`], and
//! kept numbers are committed as a single batch at the end of the pass.

mod engine;
mod error;
mod normalize;
mod pipeline;
mod rewrite;
mod scan;

pub use engine::{
    classify_book, Classification, Decision, EngineConfig, RunOutcome,
    DEFAULT_HISTORICAL_THRESHOLD,
};
pub use error::{CleanseError, CleanseResult};
pub use normalize::{normalize, NormalizeOptions};
pub use pipeline::{derive_output_name, load_workbook, process_workbook, PipelineOutput};
pub use rewrite::rewrite_book;
pub use scan::{scan_book, Candidate, CellScanner, ScanOptions, DEFAULT_MIN_DIGITS, DEFAULT_SEPARATORS};
