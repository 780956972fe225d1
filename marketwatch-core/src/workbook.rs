//! Workbook loading and CSV export.
//!
//! The converter only needs a rectangular grid of text: the first row of the
//! first worksheet is the header, everything below it is data. Cell typing is
//! flattened to text here so the CSV reads the same way a spreadsheet tool
//! would print it.

use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading workbooks or writing their CSV form.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open workbook {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("workbook {path} has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A header row plus zero or more data rows, all as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WorkbookTable {
    /// Split a grid into header (first row) and data rows.
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let header = grid.remove(0);
        Self { header, rows: grid }
    }

    /// No data rows. A sheet holding only a header row counts as empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Write the table as CSV, header first. Short rows are padded with empty
    /// fields so every record has the same width.
    ///
    /// The file is written to `{path}.tmp` and renamed into place.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let tmp_path = tmp_path_for(path);
        let width = self.width();

        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(false)
                .from_path(&tmp_path)?;
            writer.write_record(padded(&self.header, width))?;
            for row in &self.rows {
                writer.write_record(padded(row, width))?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            TableError::Io(e)
        })?;
        Ok(())
    }
}

fn padded(row: &[String], width: usize) -> Vec<&str> {
    let mut out: Vec<&str> = row.iter().map(String::as_str).collect();
    out.resize(width, "");
    out
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Loads a workbook file into a [`WorkbookTable`].
pub trait WorkbookLoader {
    fn load(&self, path: &Path) -> Result<WorkbookTable, TableError>;
}

/// Reads `.xlsx`/`.xls`/`.ods` files with calamine, first worksheet only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineLoader;

impl WorkbookLoader for CalamineLoader {
    fn load(&self, path: &Path) -> Result<WorkbookTable, TableError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| TableError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::NoWorksheet {
                path: path.to_path_buf(),
            })?
            .map_err(|e| TableError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let grid: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(WorkbookTable::from_grid(grid))
    }
}

/// Flatten a cell to the text written into the CSV.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(value) => format_number(value.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Integral floats print without a fraction; everything else uses the
/// shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_only_sheet_is_empty() {
        let table = WorkbookTable::from_grid(grid(&[&["a", "b"]]));
        assert!(table.is_empty());
        assert_eq!(table.header, vec!["a", "b"]);

        let blank = WorkbookTable::from_grid(Vec::new());
        assert!(blank.is_empty());
        assert_eq!(blank.width(), 0);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn cell_flattening() {
        assert_eq!(cell_to_string(&Data::String("  فولاد ".into())), "فولاد");
        assert_eq!(cell_to_string(&Data::Float(15.0)), "15");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "True");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn write_csv_pads_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = WorkbookTable::from_grid(grid(&[
            &["title", "", ""],
            &["x", "y"],
            &["1", "2", "3"],
        ]));

        table.write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "title,,\nx,y,\n1,2,3\n");
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn write_csv_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = WorkbookTable::from_grid(grid(&[&["name"], &["a,b"]]));

        table.write_csv(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name\n\"a,b\"\n");
    }

    #[test]
    fn loading_garbage_reports_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-01-02.xlsx");
        fs::write(&path, b"<html>not a workbook</html>").unwrap();

        let err = CalamineLoader.load(&path).unwrap_err();
        assert!(matches!(err, TableError::Open { .. }), "{err}");
    }

    #[test]
    fn loading_missing_file_reports_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CalamineLoader
            .load(&dir.path().join("absent.xlsx"))
            .unwrap_err();
        assert!(matches!(err, TableError::Open { .. }), "{err}");
    }
}
