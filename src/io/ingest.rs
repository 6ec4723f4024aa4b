//! File ingest.
//!
//! Turns a CSV or Excel file into a [`Dataset`], routed by extension:
//!
//! - `.csv` — the `csv` crate, flexible field counts, trimmed fields
//! - `.xlsx` / `.xls` — `calamine`, first worksheet, first row as header
//!
//! A cell becomes [`Value::Number`] only when the *whole* field is a finite
//! float; anything else stays text and the loose parse decides later. Header
//! names keep their casing but are trimmed and BOM-stripped.
//!
//! Malformed CSV records are collected as row-level errors and reported, not
//! raised; a file with a header and zero usable rows is a valid (empty)
//! dataset. Only a missing/unreadable file or a table with no header at all
//! is an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::domain::{Dataset, Value};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus provenance for the report header.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    /// Human-readable origin ("products.csv", "demo (seed 42)").
    pub source: String,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

impl IngestedData {
    /// Wrap an already-built dataset (demo data, tests).
    pub fn from_dataset(dataset: Dataset, source: impl Into<String>) -> Self {
        let rows_read = dataset.row_count();
        Self {
            dataset,
            source: source.into(),
            rows_read,
            row_errors: Vec::new(),
        }
    }

    /// Rows that were read but did not make it into the dataset.
    pub fn rows_skipped(&self) -> usize {
        self.rows_read.saturating_sub(self.dataset.row_count())
    }
}

/// Load a dataset from a file, routed by extension.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let file = File::open(path).map_err(|e| {
                AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
            })?;
            let (dataset, row_errors, rows_read) = read_csv(file)?;
            Ok(IngestedData {
                dataset,
                source,
                rows_read,
                row_errors,
            })
        }
        "xlsx" | "xls" => {
            let dataset = read_spreadsheet(path)?;
            Ok(IngestedData::from_dataset(dataset, source))
        }
        _ => Err(AppError::usage(format!(
            "Unsupported file type '{}': expected .csv, .xlsx or .xls",
            source
        ))),
    }
}

/// Decode CSV from any reader (tests feed cursors through this).
pub fn read_csv(input: impl Read) -> Result<(Dataset, Vec<RowError>, usize), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?;
    let columns: Vec<String> = headers.iter().map(clean_header).collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(AppError::data("CSV has no header row."));
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => {
                let mut row: Vec<Value> = record.iter().map(typed_cell).collect();
                // Extra trailing fields have no column to live under.
                row.truncate(columns.len());
                rows.push(row);
            }
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok((Dataset::new(columns, rows), row_errors, rows_read))
}

fn read_spreadsheet(path: &Path) -> Result<Dataset, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        AppError::usage(format!("Failed to open workbook '{}': {e}", path.display()))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::data("Workbook has no worksheets."))?
        .map_err(|e| AppError::data(format!("Failed to read first worksheet: {e}")))?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Err(AppError::data("Worksheet has no header row."));
    };
    let columns: Vec<String> = header_row
        .iter()
        .map(|cell| clean_header(&cell.to_string()))
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(AppError::data("Worksheet has no header row."));
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in rows_iter {
        // Spreadsheet ranges pad to the used area; drop rows that carry
        // nothing at all.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let mut cells: Vec<Value> = row.iter().map(sheet_cell).collect();
        cells.truncate(columns.len());
        rows.push(cells);
    }

    Ok(Dataset::new(columns, rows))
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Type a CSV field: a whole-field finite float becomes a number.
fn typed_cell(field: &str) -> Value {
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(field.to_string()),
    }
}

fn sheet_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Text(String::new()),
        Data::Float(f) if f.is_finite() => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(b.to_string()),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn csv_rows_are_typed_per_cell() {
        let input = "name,rating,price\nPhone,4.5,199.99\nLamp,good,25\n";
        let (dataset, errors, rows_read) = read_csv(Cursor::new(input)).unwrap();
        assert_eq!(dataset.columns, vec!["name", "rating", "price"]);
        assert_eq!(rows_read, 2);
        assert!(errors.is_empty());
        assert_eq!(dataset.rows[0][1], Value::Number(4.5));
        assert_eq!(dataset.rows[1][1], Value::Text("good".into()));
        assert_eq!(dataset.rows[1][2], Value::Number(25.0));
    }

    #[test]
    fn bom_and_padding_are_stripped_from_headers() {
        let input = "\u{feff}category , rating\nBooks,4.0\n";
        let (dataset, _, _) = read_csv(Cursor::new(input)).unwrap();
        assert_eq!(dataset.columns, vec!["category", "rating"]);
    }

    #[test]
    fn short_and_long_rows_are_tolerated() {
        let input = "a,b\n1\n1,2,3\n";
        let (dataset, errors, _) = read_csv(Cursor::new(input)).unwrap();
        assert!(errors.is_empty());
        assert_eq!(dataset.rows[0].len(), 1);
        assert_eq!(dataset.rows[1].len(), 2);
        assert!(dataset.cell(0, 1).is_none());
    }

    #[test]
    fn header_only_csv_is_a_valid_empty_dataset() {
        let (dataset, errors, rows_read) = read_csv(Cursor::new("a,b,c\n")).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.column_count(), 3);
        assert!(errors.is_empty());
        assert_eq!(rows_read, 0);
    }

    #[test]
    fn empty_input_is_a_data_error() {
        let err = read_csv(Cursor::new("")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn malformed_records_become_row_errors() {
        // Invalid UTF-8 makes one record unreadable; the rest survives.
        let bytes: &[u8] = b"a,b\n\xff\xfe,1\nok,2\n";
        let (dataset, errors, rows_read) = read_csv(Cursor::new(bytes)).unwrap();
        assert_eq!(rows_read, 2);
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
        assert!(errors[0].message.contains("CSV parse error"));
    }

    #[test]
    fn unsupported_extension_is_a_usage_error() {
        let err = load_dataset(Path::new("notes.txt")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn skipped_rows_come_from_errors() {
        let data = IngestedData {
            dataset: Dataset::new(vec!["a".into()], vec![vec![Value::Number(1.0)]]),
            source: "x.csv".into(),
            rows_read: 3,
            row_errors: vec![
                RowError {
                    line: 2,
                    message: "bad".into(),
                },
                RowError {
                    line: 3,
                    message: "bad".into(),
                },
            ],
        };
        assert_eq!(data.rows_skipped(), 2);
    }
}
