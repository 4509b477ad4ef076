use crate::engine::{classify_book, EngineConfig, RunOutcome};
use crate::error::{CleanseError, CleanseResult};
use crate::rewrite::rewrite_book;
use datacleanse_ledger::FrequencyStore;
use datacleanse_sheet::Book;
use datacleanse_types::ProcessingStats;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Everything one full processing run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The cleaned workbook, ready to save.
    pub cleaned: Book,
    /// Aggregate statistics for display, history, and reporting.
    pub stats: ProcessingStats,
    /// Per-candidate decisions, for callers that need the detail.
    pub outcome: RunOutcome,
}

/// Read the input artifact, surfacing unreadable or unsupported files as
/// an input-format error before any ledger access happens.
pub fn load_workbook<P: AsRef<Path>>(path: P) -> CleanseResult<Book> {
    Book::load(path.as_ref()).map_err(|e| CleanseError::InputFormat(e.to_string()))
}

/// Output file name derived from the input: `cleaned_<stem>.xlsx`.
#[must_use]
pub fn derive_output_name(input_name: &str) -> String {
    let stem = Path::new(input_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workbook");
    format!("cleaned_{stem}.xlsx")
}

/// Run the full scan -> classify -> rewrite pass over one workbook.
///
/// The store is read and mutated only here; kept numbers land in one
/// batch, so a failed run leaves the ledger untouched.
pub fn process_workbook<S: FrequencyStore>(
    book: &Book,
    input_name: &str,
    store: &mut S,
    config: &EngineConfig,
) -> CleanseResult<PipelineOutput> {
    let started = Instant::now();

    let outcome = classify_book(book, store, config)?;
    let cleaned = rewrite_book(book, &outcome.decisions)?;

    let stats = ProcessingStats {
        total_rows: book.total_rows() as u64,
        total_numbers: outcome.total_numbers,
        intra_sheet_duplicates: outcome.intra_sheet_duplicates,
        historical_duplicates: outcome.historical_duplicates,
        valid_numbers: outcome.valid_numbers,
        processed_file_name: derive_output_name(input_name),
        processing_time_ms: started.elapsed().as_millis() as u64,
    };
    info!(file = input_name, elapsed_ms = stats.processing_time_ms, "run complete");

    Ok(PipelineOutput {
        cleaned,
        stats,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_name() {
        assert_eq!(derive_output_name("daily.xlsx"), "cleaned_daily.xlsx");
        assert_eq!(derive_output_name("leads.csv"), "cleaned_leads.xlsx");
        assert_eq!(
            derive_output_name("/data/in/2024 leads.xlsx"),
            "cleaned_2024 leads.xlsx"
        );
    }

    #[test]
    fn test_load_workbook_maps_to_input_format_error() {
        let err = load_workbook("/nonexistent/daily.xlsx").unwrap_err();
        assert!(matches!(err, CleanseError::InputFormat(_)));

        let err = load_workbook("notes.txt").unwrap_err();
        assert!(matches!(err, CleanseError::InputFormat(_)));
    }
}
