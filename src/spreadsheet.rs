//! First-worksheet record loading.
//!
//! The hand-curated inputs are spreadsheets with a header row. Excel
//! workbooks are read with calamine, delimited text with the csv crate;
//! either way the first sheet becomes a list of records keyed by the
//! header row's column names.

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

/// One worksheet row, keyed by column name.
pub type Record = HashMap<String, String>;

/// Load the first worksheet of `path` into records. The format is chosen
/// by file extension: `.xlsx`/`.xls`/`.ods` via calamine, `.csv` and
/// `.tsv`/`.tab` via the csv reader.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook_records(path),
        "csv" => load_delimited_records(path, b','),
        "tsv" | "tab" => load_delimited_records(path, b'\t'),
        other => bail!(
            "unsupported spreadsheet format '{}' for {}",
            other,
            path.display()
        ),
    }
}

fn load_workbook_records(path: &Path) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow::anyhow!("workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("failed to read first worksheet of {}", path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(index).map(cell_to_string).unwrap_or_default();
            record.insert(header.clone(), value);
        }
        if record.values().all(|value| value.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Spreadsheet editors store whole numbers as floats; "2003.0" is
        // not a useful year string.
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

fn load_delimited_records(path: &Path, delimiter: u8) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("failed to read row of {}", path.display()))?;
        let mut record = Record::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(index).unwrap_or_default().trim().to_string();
            record.insert(header.clone(), value);
        }
        if record.values().all(|value| value.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_loads_csv_records_by_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(
            &path,
            "Standard / tool,Type,Title\nSBML,Model format,\"The systems biology markup language\"\n",
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Standard / tool"], "SBML");
        assert_eq!(records[0]["Title"], "The systems biology markup language");
    }

    #[test]
    fn test_loads_tsv_and_pads_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.tsv");
        fs::write(&path, "a\tb\tc\n1\t2\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["b"], "2");
        assert_eq!(records[0]["c"], "");
    }

    #[test]
    fn test_skips_fully_blank_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "a,b\n,\nx,y\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["a"], "x");
    }

    #[test]
    fn test_rejects_unknown_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.parquet");
        fs::write(&path, "not a spreadsheet").unwrap();

        assert!(load_records(&path).is_err());
    }

    #[test]
    fn test_trims_cell_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "a,b\n  spaced  ,\tvalue\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records[0]["a"], "spaced");
        assert_eq!(records[0]["b"], "value");
    }
}
