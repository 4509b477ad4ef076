use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Whether the first row contains headers
    pub has_headers: bool,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            has_headers: false,
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first row contains headers
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

impl Sheet {
    /// Load a sheet from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Load a sheet from a CSV file with custom options
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(BufReader::new(file), options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), CsvOptions::default())
    }

    /// Load a sheet from a reader
    pub fn from_csv_reader<R: Read>(reader: R, options: CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false) // We handle headers ourselves
            .flexible(true)
            .from_reader(reader);

        let mut data: Vec<Vec<CellValue>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if options.infer_types {
                        CellValue::parse(field)
                    } else {
                        CellValue::String(field.to_string())
                    }
                })
                .collect();
            data.push(row);
        }

        let mut sheet = Sheet::with_name("Sheet1");
        *sheet.data_mut() = data;

        if options.has_headers && sheet.row_count() > 0 {
            sheet.name_columns_by_row(0)?;
        }

        Ok(sheet)
    }

    /// Save the sheet to a CSV file
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_as_csv_with_options(path, CsvOptions::default())
    }

    /// Save the sheet to a CSV file with custom options
    pub fn save_as_csv_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        options: CsvOptions,
    ) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_writer(BufWriter::new(file));

        for row in self.rows() {
            let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Render the sheet as a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut out = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut out);
            for row in self.rows() {
                let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        // csv writes valid UTF-8
        String::from_utf8(out).map_err(|e| {
            crate::error::SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let sheet = Sheet::from_data(vec![
            vec!["Name", "Phone"],
            vec!["Alice", "555-1234"],
        ]);
        sheet.save_as_csv(&path).unwrap();

        let loaded = Sheet::from_csv(&path).unwrap();
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.get(1, 1).unwrap().as_str(), "555-1234");
    }

    #[test]
    fn test_csv_type_inference() {
        let sheet = Sheet::from_csv_str("id,flag\n42,true\n").unwrap();
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::Int(42));
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::Bool(true));
    }

    #[test]
    fn test_csv_no_inference() {
        let options = CsvOptions::default().with_type_inference(false);
        let sheet = Sheet::from_csv_reader("42,true\n".as_bytes(), options).unwrap();
        assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::String("42".to_string()));
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let options = CsvOptions::default().with_delimiter(b';');
        let sheet = Sheet::from_csv_reader("Alice;5551234\n".as_bytes(), options.clone()).unwrap();
        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.get(0, 1).unwrap().as_str(), "5551234");

        let dir = tempdir().unwrap();
        let path = dir.path().join("semi.csv");
        sheet.save_as_csv_with_options(&path, options).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Alice;5551234\n");
    }

    #[test]
    fn test_csv_headers_option() {
        let options = CsvOptions::default().with_headers(true);
        let sheet = Sheet::from_csv_reader("Name,Phone\nAlice,5551234\n".as_bytes(), options)
            .unwrap();
        assert_eq!(
            sheet.column_names().unwrap(),
            &vec!["Name".to_string(), "Phone".to_string()]
        );
    }

    #[test]
    fn test_to_csv_string() {
        let sheet = Sheet::from_data(vec![vec!["a", "b"], vec!["c", "d"]]);
        let text = sheet.to_csv_string().unwrap();
        assert_eq!(text, "a,b\nc,d\n");
    }
}
