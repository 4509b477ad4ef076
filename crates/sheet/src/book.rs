use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use std::path::Path;

/// A book containing multiple sheets (preserves insertion order)
///
/// Sheet order matters: scans walk sheets in declaration order, so the
/// map is an `IndexMap` rather than a hash map.
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the book name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, mut sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn get_sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a sheet by index (0-based)
    pub fn get_sheet_by_index(&self, index: usize) -> Result<&Sheet> {
        self.sheets
            .get_index(index)
            .map(|(_, sheet)| sheet)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: format!("index {index}"),
            })
    }

    /// Iterate over (name, sheet) pairs in declaration order
    pub fn sheets(&self) -> impl Iterator<Item = (&String, &Sheet)> {
        self.sheets.iter()
    }

    /// Total number of data rows across all sheets
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.sheets.values().map(Sheet::row_count).sum()
    }

    /// Load a book from a file, dispatching on the extension (.xlsx or .csv)
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for unknown extensions, or the underlying
    /// reader error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match extension_of(path).as_deref() {
            Some("xlsx") => Self::from_xlsx(path),
            Some("csv") => {
                let sheet = Sheet::from_csv(path)?;
                let sheet_name = sheet.name().to_string();
                let mut book = Book::with_name(&file_stem_of(path));
                book.add_sheet(&sheet_name, sheet)?;
                Ok(book)
            }
            other => Err(SheetError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Save the book to a file, dispatching on the extension (.xlsx or .csv)
    ///
    /// CSV output writes the first sheet only, matching the format's
    /// single-table shape.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match extension_of(path).as_deref() {
            Some("xlsx") => self.save_as_xlsx(path),
            Some("csv") => self.get_sheet_by_index(0)?.save_as_csv(path),
            other => Err(SheetError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn file_stem_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Book1")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut book = Book::new();
        assert!(book.is_empty());

        book.add_sheet("Data", Sheet::new()).unwrap();
        book.add_sheet("Summary", Sheet::new()).unwrap();

        assert!(!book.is_empty());
        assert_eq!(book.sheet_count(), 2);
        assert!(book.has_sheet("Data"));
        assert!(book.get_sheet("Missing").is_err());
        assert!(book.add_sheet("Data", Sheet::new()).is_err());

        book.set_name("Daily Numbers");
        assert_eq!(book.name(), "Daily Numbers");
    }

    #[test]
    fn test_get_sheet_mut() {
        let mut book = Book::new();
        book.add_sheet("Data", Sheet::from_data(vec![vec!["x"]]))
            .unwrap();

        book.get_sheet_mut("Data").unwrap().set(0, 0, "y").unwrap();
        assert_eq!(book.get_sheet("Data").unwrap().get(0, 0).unwrap().as_str(), "y");
        assert!(book.get_sheet_mut("Missing").is_err());
    }

    #[test]
    fn test_declaration_order() {
        let mut book = Book::new();
        book.add_sheet("Zulu", Sheet::new()).unwrap();
        book.add_sheet("Alpha", Sheet::new()).unwrap();
        book.add_sheet("Mike", Sheet::new()).unwrap();

        // Insertion order, not lexical order.
        assert_eq!(book.sheet_names(), vec!["Zulu", "Alpha", "Mike"]);
        assert_eq!(book.get_sheet_by_index(1).unwrap().name(), "Alpha");
    }

    #[test]
    fn test_total_rows() {
        let mut book = Book::new();
        book.add_sheet("A", Sheet::from_data(vec![vec![1], vec![2]]))
            .unwrap();
        book.add_sheet("B", Sheet::from_data(vec![vec![3]])).unwrap();
        assert_eq!(book.total_rows(), 3);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = Book::load("input.pdf").unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedFormat(ext) if ext == "pdf"));
    }
}
