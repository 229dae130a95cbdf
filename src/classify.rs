use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::debug;

use crate::plan::ClassificationConfig;
use crate::table::{CellValue, Sheet};

/// Optional sign, one optional currency symbol, an optional sign after the
/// symbol, then digits with `,` or `_` grouping.
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<lead>[-+]?)\s*(?P<symbol>[$€£¥₹￥])?\s*(?P<inner>[-+]?)(?P<digits>(?:[0-9]{1,3}(?:[,_][0-9]{3})+|[0-9]+)(?:\.[0-9]+)?|\.[0-9]+)$",
    )
    .expect("Invalid regex pattern for currency amounts")
});

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numerical,
    Date,
    Categorical,
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ColumnKind::Numerical => "numerical",
            ColumnKind::Date => "date",
            ColumnKind::Categorical => "categorical",
        };
        write!(f, "{}", label)
    }
}

/// Column name to kind, in sheet column order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ColumnClassification {
    columns: IndexMap<String, ColumnKind>,
}

impl ColumnClassification {
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns.get(column).copied()
    }

    pub fn numerical(&self) -> Vec<String> {
        self.of_kind(ColumnKind::Numerical)
    }

    pub fn categorical(&self) -> Vec<String> {
        self.of_kind(ColumnKind::Categorical)
    }

    pub fn dates(&self) -> Vec<String> {
        self.of_kind(ColumnKind::Date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnKind)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl FromIterator<(String, ColumnKind)> for ColumnClassification {
    fn from_iter<T: IntoIterator<Item = (String, ColumnKind)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Labels every column of the sheet. Never fails: a column with no usable
/// cells is categorical.
pub fn classify_columns(sheet: &Sheet, config: &ClassificationConfig) -> ColumnClassification {
    sheet
        .columns
        .iter()
        .map(|column| {
            let values: Vec<&CellValue> = sheet.column_values(column).collect();
            let kind = classify_column(column, &values, config);
            debug!(
                "Column '{}' classified as {} ({} non-empty cells)",
                column,
                kind,
                values.len()
            );
            (column.clone(), kind)
        })
        .collect()
}

/// Classifies one column from its header and its non-empty cells in row
/// order.
pub fn classify_column(
    header: &str,
    values: &[&CellValue],
    config: &ClassificationConfig,
) -> ColumnKind {
    if is_date_header(header, &config.date_header_tokens)
        || is_sequential_serial(values, config.date_serial_threshold)
    {
        return ColumnKind::Date;
    }

    let numerical = !values.is_empty()
        && values.iter().all(|value| match parse_numeric(value) {
            Some(n) => n.abs() < config.numeric_ceiling,
            None => false,
        });

    if numerical {
        ColumnKind::Numerical
    } else {
        ColumnKind::Categorical
    }
}

pub fn is_date_header(header: &str, tokens: &[String]) -> bool {
    let header = header.to_lowercase();
    tokens
        .iter()
        .filter(|token| !token.is_empty())
        .any(|token| header.contains(&token.to_lowercase()))
}

/// At least two integral numbers above `threshold`, each exactly one more
/// than the previous.
pub fn is_sequential_serial(values: &[&CellValue], threshold: f64) -> bool {
    if values.len() < 2 {
        return false;
    }

    let mut serials = Vec::with_capacity(values.len());
    for value in values {
        match value.as_number() {
            Some(n) if n.fract() == 0.0 && n > threshold => serials.push(n),
            _ => return false,
        }
    }

    serials.windows(2).all(|pair| pair[1] - pair[0] == 1.0)
}

/// Reads a cell as a number. Text is accepted when it is a plain number or
/// a currency amount such as `$1,200.50` or `-€3_000`.
pub fn parse_numeric(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(text) => parse_numeric_text(text),
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(n) = trimmed.parse::<f64>() {
        return n.is_finite().then_some(n);
    }

    let caps = CURRENCY_RE.captures(trimmed)?;
    let lead = caps.name("lead").map_or("", |m| m.as_str());
    let inner = caps.name("inner").map_or("", |m| m.as_str());
    if !lead.is_empty() && !inner.is_empty() {
        return None;
    }

    let digits: String = caps["digits"]
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let magnitude = digits.parse::<f64>().ok()?;

    if lead == "-" || inner == "-" {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}
