use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A decoded spreadsheet cell.
///
/// Spreadsheet dates arrive as their serial number; the classifier decides
/// whether a numeric column is really a date column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// True for text cells holding nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Integral numbers print without a trailing `.0`, matching how a
/// spreadsheet shows them.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One spreadsheet row keyed by column header, in sheet column order.
/// Empty cells are absent.
pub type RawRow = IndexMap<String, CellValue>;

/// The first worksheet of an uploaded file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    /// Build a sheet from header names and positional rows. Cells past the
    /// header width are ignored; missing cells are left out of the row.
    pub fn from_records(columns: Vec<String>, records: Vec<Vec<Option<CellValue>>>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .zip(record)
                    .filter_map(|(column, cell)| cell.map(|value| (column.clone(), value)))
                    .collect::<RawRow>()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-empty cells of a column in row order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column))
            .filter(|value| !value.is_blank())
    }

    pub fn stats(&self) -> String {
        format!("Columns: {}, Rows: {}", self.columns.len(), self.rows.len())
    }
}

/// A row with no cell holding anything but whitespace.
pub fn is_empty_row(row: &RawRow) -> bool {
    row.values().all(CellValue::is_blank)
}
