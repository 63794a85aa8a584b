use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// CellValue – a single table cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common CSV content. The type is
/// guessed per cell from the raw text (see `loader::guess_cell`).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Whether the cell counts towards a numeric column.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// The field written back to CSV; null round-trips to an empty field.
    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DataTable – one loaded CSV file
// ---------------------------------------------------------------------------

/// A parsed tabular file: header names plus typed rows. Rows always have
/// exactly `column_names.len()` cells (short records are padded with Null
/// by the loader).
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// Row-major cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        DataTable { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// A column is numeric when it holds at least one Integer/Float cell
    /// and nothing except Integer/Float/Null cells. An all-null column is
    /// not numeric.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        let mut saw_number = false;
        for row in &self.rows {
            match &row[idx] {
                v if v.is_numeric() => saw_number = true,
                CellValue::Null => {}
                _ => return false,
            }
        }
        saw_number
    }

    /// Names of all numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|name| self.is_numeric_column(name))
            .cloned()
            .collect()
    }

    /// Non-null values of a column as `f64`, or `None` if the column does
    /// not exist. Null cells are skipped, so the result can be shorter
    /// than the row count.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row[idx].as_f64())
                .collect(),
        )
    }

    /// Paired values of two columns, keeping only rows where both cells
    /// are numeric.
    pub fn paired_numeric_values(&self, x: &str, y: &str) -> Option<(Vec<f64>, Vec<f64>)> {
        let xi = self.column_index(x)?;
        let yi = self.column_index(y)?;
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for row in &self.rows {
            if let (Some(xv), Some(yv)) = (row[xi].as_f64(), row[yi].as_f64()) {
                xs.push(xv);
                ys.push(yv);
            }
        }
        Some((xs, ys))
    }

    /// A new table containing only the rows whose flag is `true`. The
    /// flag slice must be the same length as the table.
    pub fn select_rows(&self, keep: &[bool]) -> DataTable {
        let rows = self
            .rows
            .iter()
            .zip(keep)
            .filter(|(_, &k)| k)
            .map(|(row, _)| row.clone())
            .collect();
        DataTable {
            column_names: self.column_names.clone(),
            rows,
        }
    }

    /// Write the table as CSV: header row, no index column.
    pub fn write_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.column_names)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_csv_field()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
