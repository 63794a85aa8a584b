use std::path::Path;

use log::debug;

use super::model::{CellValue, DataTable};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Input gate
// ---------------------------------------------------------------------------

/// Check a path before attempting to parse it. The two hard per-file
/// rejections: the path must exist and must carry a `.csv` extension
/// (case-insensitive).
pub fn validate_path(path: &Path) -> Result<(), AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        return Err(AnalysisError::NotCsv(path.to_path_buf()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a CSV file into a [`DataTable`], guessing a type for every cell.
/// Short records are padded with nulls so all rows match the header width.
pub fn load_csv(path: &Path) -> Result<DataTable, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| AnalysisError::Load(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalysisError::Load(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AnalysisError::Load(format!("row {row_no}: {e}")))?;
        let mut cells: Vec<CellValue> = record.iter().map(guess_cell).collect();
        cells.resize(headers.len(), CellValue::Null);
        rows.push(cells);
    }

    debug!(
        "loaded {} with {} rows, {} columns",
        path.display(),
        rows.len(),
        headers.len()
    );
    Ok(DataTable::new(headers, rows))
}

/// Guess the type of a cell from its raw text. Integers win over floats,
/// and numbers win over booleans, so `"1"` is an integer, not `true`.
fn guess_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}
