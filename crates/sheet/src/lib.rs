//! Workbook/sheet model for datacleanse
//!
//! Provides a small tabular-data API over the formats the cleaner consumes
//! and produces: XLSX workbooks and CSV tables. Cells carry inferred types,
//! sheets are row-major 2D grids, and books preserve sheet declaration
//! order (scans depend on it).
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use datacleanse_sheet::Sheet;
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["Name", "Phone"],
//!     vec!["Alice", "555-1234"],
//!     vec!["Bob", "555-9999"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 3);
//! assert_eq!(sheet.col_count(), 2);
//! ```
//!
//! ## Working with books
//!
//! ```
//! use datacleanse_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Morning", Sheet::new()).unwrap();
//! book.add_sheet("Evening", Sheet::new()).unwrap();
//!
//! assert_eq!(book.sheet_names(), vec!["Morning", "Evening"]);
//! ```
//!
//! ## Loading from disk
//!
//! ```no_run
//! use datacleanse_sheet::Book;
//!
//! let book = Book::load("daily.xlsx").unwrap();
//! ```

mod book;
mod cell;
mod csv;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export XLSX read options.
pub use xlsx::XlsxReadOptions;
