use crate::engine::{Classification, Decision};
use crate::error::CleanseResult;
use datacleanse_sheet::Book;
use std::collections::HashMap;
use tracing::debug;

/// Apply the engine's decisions back onto the workbook, producing the
/// cleaned artifact.
///
/// Removal is row-level: a row is dropped when it contained at least one
/// candidate and none of its candidates was kept. Rows without candidates
/// (headers, non-phone rows) pass through unchanged, as do column names
/// and every non-phone column of retained rows. Neither input is mutated.
pub fn rewrite_book(book: &Book, decisions: &[Decision]) -> CleanseResult<Book> {
    // (sheet, row) -> did any candidate in the row survive?
    let mut any_kept: HashMap<(usize, usize), bool> = HashMap::new();
    for decision in decisions {
        let key = (decision.candidate.sheet, decision.candidate.row);
        let entry = any_kept.entry(key).or_insert(false);
        if decision.classification == Classification::Kept {
            *entry = true;
        }
    }

    let mut cleaned = Book::with_name(book.name());
    for (sheet_idx, (name, sheet)) in book.sheets().enumerate() {
        let dropped: Vec<usize> = (0..sheet.row_count())
            .filter(|&row| any_kept.get(&(sheet_idx, row)) == Some(&false))
            .collect();
        debug!(sheet = %name, dropped = dropped.len(), "rewriting sheet");

        let mut rewritten = sheet.clone();
        rewritten.row_delete_multi(dropped)?;
        cleaned.add_sheet(name, rewritten)?;
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{classify_book, EngineConfig};
    use datacleanse_ledger::MemoryStore;
    use datacleanse_sheet::Sheet;

    fn clean(book: &Book, store: &mut MemoryStore) -> Book {
        let outcome = classify_book(book, store, &EngineConfig::default()).unwrap();
        rewrite_book(book, &outcome.decisions).unwrap()
    }

    #[test]
    fn test_duplicate_rows_removed_headers_kept() {
        let mut book = Book::new();
        book.add_sheet(
            "Daily",
            Sheet::from_data(vec![
                vec!["Name", "Phone"],
                vec!["Alice", "5551234"],
                vec!["Alice again", "555-1234"],
                vec!["Bob", "5559999"],
            ]),
        )
        .unwrap();

        let cleaned = clean(&book, &mut MemoryStore::new());
        let sheet = cleaned.get_sheet("Daily").unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.get(0, 0).unwrap().as_str(), "Name");
        assert_eq!(sheet.get(1, 0).unwrap().as_str(), "Alice");
        assert_eq!(sheet.get(2, 0).unwrap().as_str(), "Bob");
        // Non-phone columns of retained rows are untouched.
        assert_eq!(sheet.get(1, 1).unwrap().as_str(), "5551234");
    }

    #[test]
    fn test_historically_capped_rows_removed() {
        let mut book = Book::new();
        book.add_sheet(
            "Daily",
            Sheet::from_data(vec![vec!["Alice", "5550000001"], vec!["Bob", "5550000002"]]),
        )
        .unwrap();

        let mut store = MemoryStore::with_counts([("5550000001", 99)]);
        let cleaned = clean(&book, &mut store);
        let sheet = cleaned.get_sheet("Daily").unwrap();

        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.get(0, 0).unwrap().as_str(), "Bob");
    }

    #[test]
    fn test_rows_without_candidates_pass_through() {
        let mut book = Book::new();
        book.add_sheet(
            "Daily",
            Sheet::from_data(vec![
                vec!["Header only", "no numbers here"],
                vec!["Alice", "5551234"],
            ]),
        )
        .unwrap();

        let cleaned = clean(&book, &mut MemoryStore::new());
        assert_eq!(cleaned.get_sheet("Daily").unwrap().row_count(), 2);
    }

    #[test]
    fn test_multi_sheet_rewrite_preserves_order() {
        let mut book = Book::new();
        book.add_sheet("Evening", Sheet::from_data(vec![vec!["5551234"]]))
            .unwrap();
        book.add_sheet("Morning", Sheet::from_data(vec![vec!["555-1234"]]))
            .unwrap();

        // Second sheet's number duplicates the first sheet's within the run.
        let cleaned = clean(&book, &mut MemoryStore::new());
        assert_eq!(cleaned.sheet_names(), vec!["Evening", "Morning"]);
        assert_eq!(cleaned.get_sheet("Evening").unwrap().row_count(), 1);
        assert_eq!(cleaned.get_sheet("Morning").unwrap().row_count(), 0);
    }

    #[test]
    fn test_row_with_any_kept_candidate_survives() {
        // Two phone cells in one row: one capped, one fresh. The row stays.
        let mut book = Book::new();
        book.add_sheet(
            "Daily",
            Sheet::from_data(vec![vec!["5550000001", "5550000002"]]),
        )
        .unwrap();

        let mut store = MemoryStore::with_counts([("5550000001", 99)]);
        let cleaned = clean(&book, &mut store);
        assert_eq!(cleaned.get_sheet("Daily").unwrap().row_count(), 1);
    }

    #[test]
    fn test_input_book_unmutated() {
        let mut book = Book::new();
        book.add_sheet(
            "Daily",
            Sheet::from_data(vec![vec!["5551234"], vec!["555-1234"]]),
        )
        .unwrap();

        let _ = clean(&book, &mut MemoryStore::new());
        assert_eq!(book.get_sheet("Daily").unwrap().row_count(), 2);
    }
}
