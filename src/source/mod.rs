//! Tabular input loading
//!
//! Reads `.csv`/`.tsv` via the csv crate and `.xlsx`/`.xls` workbooks via
//! calamine. Every cell is kept as raw text: numeric coercion would corrupt
//! identifiers like `A.06`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

/// A fully-loaded tabular source: one header row plus string-typed data rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Errors raised while loading a tabular source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("no rows found in file")]
    Empty,
}

/// Selects a worksheet by zero-based index or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl From<&str> for SheetSelector {
    /// An argument that parses as an integer is an index; anything else is a
    /// sheet name.
    fn from(s: &str) -> Self {
        match s.trim().parse::<usize>() {
            Ok(i) => SheetSelector::Index(i),
            Err(_) => SheetSelector::Name(s.to_string()),
        }
    }
}

/// Load a tabular file fully into memory.
///
/// `.csv` and `.tsv` extensions go through the csv reader (flexible record
/// lengths, all fields trimmed); anything else is opened as a workbook, with
/// `sheet` selecting a worksheet (first sheet when `None`). Returns
/// [`SourceError::Empty`] when there are no data rows.
pub fn load_table(path: &Path, sheet: Option<&SheetSelector>) -> Result<Table, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        _ => load_workbook(path, sheet)?,
    };

    if table.rows.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(table)
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::Open {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(Table { headers, rows })
}

fn load_workbook(path: &Path, sheet: Option<&SheetSelector>) -> Result<Table, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();

    let name = match sheet {
        None => names.first().cloned().ok_or(SourceError::Empty)?,
        Some(SheetSelector::Index(i)) => names
            .get(*i)
            .cloned()
            .ok_or_else(|| SourceError::SheetNotFound(i.to_string()))?,
        Some(SheetSelector::Name(n)) => names
            .iter()
            .find(|s| *s == n)
            .cloned()
            .ok_or_else(|| SourceError::SheetNotFound(n.clone()))?,
    };

    let range = workbook.worksheet_range(&name)?;
    let mut rows_iter = range.rows();
    let headers = rows_iter.next().map(row_to_strings).unwrap_or_default();
    let rows = rows_iter.map(row_to_strings).collect();

    Ok(Table { headers, rows })
}

fn row_to_strings(row: &[Data]) -> Vec<String> {
    row.iter()
        .map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string().trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_load_csv_headers_and_rows() {
        let f = csv_file("Policy Name,Mapped Controls\nAccess Control,\"A.5.1, A.5.2\"\n");
        let table = load_table(f.path(), None).unwrap();
        assert_eq!(table.headers, vec!["Policy Name", "Mapped Controls"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "A.5.1, A.5.2");
    }

    #[test]
    fn test_load_csv_trims_fields() {
        let f = csv_file("name,controls\n  Crypto Policy  ,  A.8.24 \n");
        let table = load_table(f.path(), None).unwrap();
        assert_eq!(table.rows[0][0], "Crypto Policy");
        assert_eq!(table.rows[0][1], "A.8.24");
    }

    #[test]
    fn test_load_csv_flexible_row_lengths() {
        let f = csv_file("a,b,c\n1,2\n1,2,3,4\n");
        let table = load_table(f.path(), None).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_headers_only_is_empty() {
        let f = csv_file("Policy Name,Mapped Controls\n");
        assert!(matches!(
            load_table(f.path(), None),
            Err(SourceError::Empty)
        ));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = load_table(Path::new("/nonexistent/mapping.csv"), None).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }

    #[test]
    fn test_sheet_selector_parses_index_first() {
        assert_eq!(SheetSelector::from("2"), SheetSelector::Index(2));
        assert_eq!(
            SheetSelector::from("Mappings"),
            SheetSelector::Name("Mappings".to_string())
        );
    }
}
