use serde::{Deserialize, Serialize};

/// Aggregate counts produced by one processing run.
///
/// The four count fields are conserved: `total_numbers` always equals
/// `intra_sheet_duplicates + historical_duplicates + valid_numbers`.
/// Serialized in camelCase, matching the payload the reporting layer
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Rows across all sheets of the input workbook.
    pub total_rows: u64,
    /// Candidates that normalized successfully, duplicates included.
    pub total_numbers: u64,
    /// Candidates rejected because the number already appeared earlier
    /// in the same run.
    pub intra_sheet_duplicates: u64,
    /// Candidates rejected because the number hit the historical
    /// frequency cap.
    pub historical_duplicates: u64,
    /// Candidates kept in the cleaned output.
    pub valid_numbers: u64,
    /// File name of the cleaned artifact.
    pub processed_file_name: String,
    /// Wall-clock duration of the run in milliseconds.
    pub processing_time_ms: u64,
}

impl ProcessingStats {
    /// Check the conservation invariant over the four count fields.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.total_numbers
            == self.intra_sheet_duplicates + self.historical_duplicates + self.valid_numbers
    }

    /// Share of candidates kept, as a percentage. Zero when the run saw
    /// no numbers at all.
    #[must_use]
    pub fn yield_percent(&self) -> f64 {
        if self.total_numbers == 0 {
            0.0
        } else {
            self.valid_numbers as f64 / self.total_numbers as f64 * 100.0
        }
    }
}

/// One persisted entry of the processing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: i64,
    /// RFC 3339 timestamp of the run.
    pub date: String,
    /// Name of the uploaded input file.
    pub file_name: String,
    pub stats: ProcessingStats,
}
