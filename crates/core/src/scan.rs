use crate::error::{CleanseError, CleanseResult};
use datacleanse_sheet::{Book, Sheet};
use regex::Regex;

/// Default minimum digit count for a phone-like cell.
pub const DEFAULT_MIN_DIGITS: usize = 7;
/// Separator characters tolerated inside a phone-like cell.
pub const DEFAULT_SEPARATORS: &str = " -()./";

/// A cell observed during a scan, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Sheet index in declaration order.
    pub sheet: usize,
    /// Row index within the sheet (0-based).
    pub row: usize,
    /// Column index within the row (0-based).
    pub column: usize,
    /// Textual cell content as observed.
    pub raw: String,
}

/// Options controlling which cells qualify as phone-number candidates.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    min_digits: usize,
    pattern: Regex,
}

impl ScanOptions {
    /// Build scan options from a minimum digit count and the set of
    /// separator characters allowed between digits.
    pub fn new(min_digits: usize, separators: &str) -> CleanseResult<Self> {
        let class = regex::escape(separators);
        let pattern = Regex::new(&format!(r"^\+?[0-9{class}]+$"))
            .map_err(|e| CleanseError::Config(format!("invalid separator set: {e}")))?;
        Ok(ScanOptions {
            min_digits,
            pattern,
        })
    }

    /// Whether a cell's textual content looks like a phone number:
    /// an optional leading `+`, then only digits and allowed separators,
    /// with at least `min_digits` digits overall.
    #[must_use]
    pub fn is_phone_like(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || !self.pattern.is_match(trimmed) {
            return false;
        }
        trimmed.chars().filter(|c| c.is_ascii_digit()).count() >= self.min_digits
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions::new(DEFAULT_MIN_DIGITS, DEFAULT_SEPARATORS)
            .expect("default scan pattern is valid")
    }
}

/// Lazy, restartable walk over a book's phone-like cells.
///
/// Order is deterministic: sheets in declaration order, rows top to
/// bottom, cells left to right. Cells that fail the pattern are skipped
/// silently. The scan is a pure read; construct a new scanner to restart.
pub struct CellScanner<'a> {
    sheets: Vec<&'a Sheet>,
    options: &'a ScanOptions,
    sheet: usize,
    row: usize,
    col: usize,
}

impl<'a> CellScanner<'a> {
    #[must_use]
    pub fn new(book: &'a Book, options: &'a ScanOptions) -> Self {
        CellScanner {
            sheets: book.sheets().map(|(_, sheet)| sheet).collect(),
            options,
            sheet: 0,
            row: 0,
            col: 0,
        }
    }
}

impl Iterator for CellScanner<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        while self.sheet < self.sheets.len() {
            let sheet = self.sheets[self.sheet];
            if self.row >= sheet.row_count() {
                self.sheet += 1;
                self.row = 0;
                self.col = 0;
                continue;
            }
            let row = &sheet.data()[self.row];
            if self.col >= row.len() {
                self.row += 1;
                self.col = 0;
                continue;
            }

            let col = self.col;
            self.col += 1;

            let cell = &row[col];
            if cell.is_null() {
                continue;
            }
            let raw = cell.as_str();
            if self.options.is_phone_like(&raw) {
                return Some(Candidate {
                    sheet: self.sheet,
                    row: self.row,
                    column: col,
                    raw,
                });
            }
        }
        None
    }
}

/// Convenience constructor for a scan over a whole book.
#[must_use]
pub fn scan_book<'a>(book: &'a Book, options: &'a ScanOptions) -> CellScanner<'a> {
    CellScanner::new(book, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacleanse_sheet::Sheet;

    fn book_of(rows: Vec<Vec<&str>>) -> Book {
        let mut book = Book::new();
        book.add_sheet("Sheet1", Sheet::from_data(rows)).unwrap();
        book
    }

    #[test]
    fn test_is_phone_like() {
        let options = ScanOptions::default();
        assert!(options.is_phone_like("5551234"));
        assert!(options.is_phone_like("555-123-4567"));
        assert!(options.is_phone_like("+1 (555) 123.4567"));
        assert!(options.is_phone_like(" 5551234 "));

        assert!(!options.is_phone_like(""));
        assert!(!options.is_phone_like("Alice"));
        assert!(!options.is_phone_like("555-12")); // too few digits
        assert!(!options.is_phone_like("call 5551234")); // stray letters
        assert!(!options.is_phone_like("2024-01-02T10:00")); // colon not allowed
    }

    #[test]
    fn test_scan_skips_non_matching_cells() {
        let book = book_of(vec![
            vec!["Name", "Phone"],
            vec!["Alice", "555-1234"],
            vec!["Bob", ""],
        ]);
        let options = ScanOptions::default();
        let found: Vec<Candidate> = scan_book(&book, &options).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, "555-1234");
        assert_eq!((found[0].row, found[0].column), (1, 1));
    }

    #[test]
    fn test_scan_order_is_row_major_across_sheets() {
        let mut book = Book::new();
        book.add_sheet(
            "Late",
            Sheet::from_data(vec![vec!["5550001", "5550002"], vec!["5550003"]]),
        )
        .unwrap();
        book.add_sheet("Early", Sheet::from_data(vec![vec!["5550004"]]))
            .unwrap();

        let options = ScanOptions::default();
        let raws: Vec<String> = scan_book(&book, &options).map(|c| c.raw).collect();
        // Declaration order wins, not sheet names.
        assert_eq!(raws, vec!["5550001", "5550002", "5550003", "5550004"]);

        let sheets: Vec<usize> = scan_book(&book, &options).map(|c| c.sheet).collect();
        assert_eq!(sheets, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let book = book_of(vec![vec!["5551234"]]);
        let options = ScanOptions::default();
        assert_eq!(scan_book(&book, &options).count(), 1);
        assert_eq!(scan_book(&book, &options).count(), 1);
    }

    #[test]
    fn test_numeric_cells_scan_as_text() {
        let mut book = Book::new();
        let mut sheet = Sheet::new();
        *sheet.data_mut() = vec![vec![
            datacleanse_sheet::CellValue::Float(5551234567.0),
            datacleanse_sheet::CellValue::Int(42),
        ]];
        book.add_sheet("Numbers", sheet).unwrap();

        let options = ScanOptions::default();
        let found: Vec<Candidate> = scan_book(&book, &options).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, "5551234567");
    }

    #[test]
    fn test_custom_separator_set() {
        let options = ScanOptions::new(7, " -").unwrap();
        assert!(options.is_phone_like("555-123 4567"));
        assert!(!options.is_phone_like("555.123.4567")); // dot not in set
    }
}
