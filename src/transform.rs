use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

use crate::classify::{parse_numeric, ColumnClassification, ColumnKind};
use crate::errors::{PipelineError, PipelineResult};
use crate::plan::TransformConfig;
use crate::table::{is_empty_row, CellValue, RawRow, Sheet};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Multi-series line chart over the numerical columns
    #[default]
    Line,
    /// Co-occurrence graph over the categorical columns
    Entity,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Line => ViewMode::Entity,
            ViewMode::Entity => ViewMode::Line,
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Line => write!(f, "line"),
            ViewMode::Entity => write!(f, "entity"),
        }
    }
}

/// What to do with a numerical cell that is missing or does not parse.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellFallback {
    /// Plot the point at 0
    #[default]
    Zero,
    /// Leave the whole row out of the chart
    DropRow,
}

/// How a date-like first column becomes the chart row name.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateLabels {
    /// Spreadsheet serials become `YYYY-MM-DD`
    #[default]
    Iso,
    /// The cell is used as it is
    Raw,
}

/// Key a flat [`ChartRow`] reserves for the row label.
pub const NAME_KEY: &str = "name";

/// One point on the x-axis of the line chart. Serialises flat:
/// `{"name": "2024-01-01", "Sales": 10}`. Series keys come from
/// [`series_keys`] and never equal [`NAME_KEY`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChartRow {
    pub name: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

/// The categorical fields of one row, trimmed, blanks omitted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GraphRow {
    pub name: String,
    pub fields: IndexMap<String, String>,
}

/// A numerical cell that could not be read. `row` is the zero-based index
/// among the sheet's non-empty rows.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CellParseFailure {
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl Display for CellParseFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.value.is_empty() {
            write!(f, "row {}: column '{}' is empty", self.row, self.column)
        } else {
            write!(
                f,
                "row {}: column '{}' has non-numeric value '{}'",
                self.row, self.column, self.value
            )
        }
    }
}

/// Transformed rows plus the cells that needed a fallback.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transformed<T> {
    pub rows: Vec<T>,
    pub failures: Vec<CellParseFailure>,
}

/// Keys the numerical columns take in a [`ChartRow`], in column order. A
/// column named like [`NAME_KEY`] gets the first free `_1`, `_2`, … suffix.
pub fn series_keys(numerical: &[String]) -> Vec<String> {
    numerical
        .iter()
        .map(|column| {
            if column != NAME_KEY {
                return column.clone();
            }
            (1..)
                .map(|n| format!("{}_{}", column, n))
                .find(|candidate| !numerical.contains(candidate))
                .unwrap_or_else(|| column.clone())
        })
        .collect()
}

/// Shapes the sheet into chart rows, one per non-empty row (fewer with
/// [`CellFallback::DropRow`]).
pub fn transform_line(
    sheet: &Sheet,
    classification: &ColumnClassification,
    config: &TransformConfig,
) -> PipelineResult<Transformed<ChartRow>> {
    let rows = non_empty_rows(sheet)?;
    let numerical = classification.numerical();
    if numerical.is_empty() {
        return Err(PipelineError::NoNumericalData);
    }

    let keys = series_keys(&numerical);
    for (column, key) in numerical.iter().zip(&keys) {
        if column != key {
            warn!(
                "Numerical column '{}' clashes with the row label key, charted as '{}'",
                column, key
            );
        }
    }

    let first_column = sheet.columns.first();
    let first_is_date = first_column
        .and_then(|column| classification.kind(column))
        .map_or(false, |kind| kind == ColumnKind::Date);

    let mut chart_rows = Vec::with_capacity(rows.len());
    let mut failures = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let name = first_column
            .and_then(|column| row.get(column))
            .map(|cell| row_label(cell, first_is_date, config.date_labels))
            .unwrap_or_default();

        let mut values = IndexMap::with_capacity(numerical.len());
        let mut row_failed = false;
        for (column, key) in numerical.iter().zip(&keys) {
            let cell = row.get(column.as_str());
            match cell.and_then(parse_numeric) {
                Some(n) => {
                    values.insert(key.clone(), n);
                }
                None => {
                    let failure = CellParseFailure {
                        row: index,
                        column: column.clone(),
                        value: cell.map(|c| c.to_string()).unwrap_or_default(),
                    };
                    warn!("Cell fallback ({:?}): {}", config.cell_fallback, failure);
                    failures.push(failure);
                    row_failed = true;
                    values.insert(key.clone(), 0.0);
                }
            }
        }

        if row_failed && config.cell_fallback == CellFallback::DropRow {
            continue;
        }
        chart_rows.push(ChartRow { name, values });
    }

    debug!(
        "Line transform: {} of {} rows, {} series, {} cell failures",
        chart_rows.len(),
        rows.len(),
        numerical.len(),
        failures.len()
    );

    Ok(Transformed {
        rows: chart_rows,
        failures,
    })
}

/// Shapes the sheet into graph input rows holding only categorical fields.
pub fn transform_entity(
    sheet: &Sheet,
    classification: &ColumnClassification,
) -> PipelineResult<Transformed<GraphRow>> {
    let rows = non_empty_rows(sheet)?;
    let categorical = classification.categorical();
    if categorical.is_empty() {
        return Err(PipelineError::NoCategoricalData);
    }

    let first_column = sheet.columns.first();
    let graph_rows: Vec<GraphRow> = rows
        .iter()
        .map(|row| {
            let name = first_column
                .and_then(|column| row.get(column))
                .map(|cell| cell.to_string())
                .unwrap_or_default();
            let fields = categorical
                .iter()
                .filter_map(|column| {
                    let value = row.get(column.as_str())?.to_string();
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some((column.clone(), trimmed.to_string()))
                    }
                })
                .collect();
            GraphRow { name, fields }
        })
        .collect();

    debug!(
        "Entity transform: {} rows over {} categorical columns",
        graph_rows.len(),
        categorical.len()
    );

    Ok(Transformed {
        rows: graph_rows,
        failures: Vec::new(),
    })
}

fn non_empty_rows(sheet: &Sheet) -> PipelineResult<Vec<&RawRow>> {
    let rows: Vec<&RawRow> = sheet.rows.iter().filter(|row| !is_empty_row(row)).collect();
    if rows.is_empty() {
        return Err(PipelineError::EmptySheet);
    }
    Ok(rows)
}

fn row_label(cell: &CellValue, is_date: bool, labels: DateLabels) -> String {
    match (cell, is_date, labels) {
        (CellValue::Number(serial), true, DateLabels::Iso) => {
            excel_serial_to_iso(*serial).unwrap_or_else(|| cell.to_string())
        }
        _ => cell.to_string(),
    }
}

/// Converts a spreadsheet date serial (1900 date system) to `YYYY-MM-DD`.
/// The time-of-day fraction is ignored.
///
/// The 1900 system counts a 1900-02-29 that never existed as serial 60.
/// Serials 1 to 59 count from 1899-12-31, serial 60 has no date, and later
/// serials count from 1899-12-30.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    // 2958465 is 9999-12-31
    if !serial.is_finite() || !(1.0..2958466.0).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    let epoch = match days {
        1..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    let date = epoch.checked_add_signed(Duration::days(days))?;
    Some(date.format("%Y-%m-%d").to_string())
}
