use crate::error::CleanseResult;
use crate::normalize::{normalize, NormalizeOptions};
use crate::scan::{scan_book, Candidate, ScanOptions};
use datacleanse_ledger::FrequencyStore;
use datacleanse_sheet::Book;
use std::collections::HashSet;
use tracing::{debug, info};

/// Default historical frequency cap: the "2x" rule applied to a baseline
/// of two runs per day. A number whose prior kept count reaches this value
/// is rejected.
pub const DEFAULT_HISTORICAL_THRESHOLD: u64 = 4;

/// Outcome attached to each candidate after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// First occurrence this run, under the historical cap.
    Kept,
    /// The normalized number already appeared earlier in this run.
    IntraSheetDuplicate,
    /// Prior kept occurrences already reached the frequency cap.
    HistoricalLimitExceeded,
}

/// One classified candidate.
#[derive(Debug, Clone)]
pub struct Decision {
    pub candidate: Candidate,
    pub normalized: String,
    pub classification: Classification,
}

/// Engine configuration, pinned for the whole run.
///
/// The historical threshold is deliberately a fixed value rather than
/// something recomputed from the ledger mid-run: a moving threshold would
/// make classifications depend on commit timing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub historical_threshold: u64,
    pub scan: ScanOptions,
    pub normalize: NormalizeOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            historical_threshold: DEFAULT_HISTORICAL_THRESHOLD,
            scan: ScanOptions::default(),
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Everything one engine pass produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Per-candidate classifications in scan order.
    pub decisions: Vec<Decision>,
    /// Normalized numbers kept this run, in scan order.
    pub kept: Vec<String>,
    pub total_numbers: u64,
    pub intra_sheet_duplicates: u64,
    pub historical_duplicates: u64,
    pub valid_numbers: u64,
}

impl RunOutcome {
    /// The conservation invariant over the classification counts.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.total_numbers
            == self.intra_sheet_duplicates + self.historical_duplicates + self.valid_numbers
    }
}

/// Classify every candidate in the book and commit the kept numbers to
/// the store as one batch.
///
/// Strictly sequential in scan order: intra-sheet first occurrence wins,
/// and the ledger is consulted with prior-run counts only. Cells whose
/// content cannot be normalized are dropped without touching the counts.
///
/// # Errors
///
/// Returns an error if a ledger read or the final batch commit fails; in
/// that case no counts from this run are persisted.
pub fn classify_book<S: FrequencyStore>(
    book: &Book,
    store: &mut S,
    config: &EngineConfig,
) -> CleanseResult<RunOutcome> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = RunOutcome::default();

    for candidate in scan_book(book, &config.scan) {
        let Some(normalized) = normalize(&candidate.raw, &config.normalize) else {
            // Extraction failure: excluded from every count.
            debug!(raw = %candidate.raw, "candidate failed normalization");
            continue;
        };

        outcome.total_numbers += 1;
        let classification = if seen.contains(&normalized) {
            outcome.intra_sheet_duplicates += 1;
            Classification::IntraSheetDuplicate
        } else {
            seen.insert(normalized.clone());
            let prior = store.lookup(&normalized)?;
            if prior >= config.historical_threshold {
                outcome.historical_duplicates += 1;
                Classification::HistoricalLimitExceeded
            } else {
                outcome.valid_numbers += 1;
                outcome.kept.push(normalized.clone());
                Classification::Kept
            }
        };

        outcome.decisions.push(Decision {
            candidate,
            normalized,
            classification,
        });
    }

    store.commit_kept(&outcome.kept)?;

    info!(
        total = outcome.total_numbers,
        intra_sheet = outcome.intra_sheet_duplicates,
        historical = outcome.historical_duplicates,
        kept = outcome.valid_numbers,
        "classification pass complete"
    );
    Ok(outcome)
}
