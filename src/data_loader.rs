use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::{debug, info};

use crate::errors::{PipelineError, PipelineResult};
use crate::table::{is_empty_row, CellValue, RawRow, Sheet};

/// Container formats the decoder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetFormat {
    /// xlsx, xlsm, xlsb, xls and ods, read through calamine
    Workbook,
    Csv,
    Tsv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => Ok(SheetFormat::Workbook),
            "csv" => Ok(SheetFormat::Csv),
            "tsv" => Ok(SheetFormat::Tsv),
            _ => Err(PipelineError::UnsupportedFormat(format!(
                "unsupported extension '{}' ({})",
                extension,
                path.display()
            ))),
        }
    }
}

/// Reads the first worksheet of a file from disk.
pub fn load_sheet(path: &Path) -> PipelineResult<Sheet> {
    let format = SheetFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    info!(
        "Loading {} ({} bytes) as {:?}",
        path.display(),
        bytes.len(),
        format
    );
    decode(&bytes, format)
}

pub fn decode(bytes: &[u8], format: SheetFormat) -> PipelineResult<Sheet> {
    let sheet = match format {
        SheetFormat::Workbook => decode_workbook(bytes)?,
        SheetFormat::Csv => decode_delimited(bytes, b',')?,
        SheetFormat::Tsv => decode_delimited(bytes, b'\t')?,
    };
    debug!("Decoded sheet: {}", sheet.stats());
    Ok(sheet)
}

/// Decodes the first worksheet of a binary workbook. The first row holds
/// the column headers.
pub fn decode_workbook(bytes: &[u8]) -> PipelineResult<Sheet> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|err| PipelineError::UnsupportedFormat(err.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(PipelineError::EmptySheet),
    };

    Ok(sheet_from_range(&range))
}

fn sheet_from_range(range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let header_cells: Vec<Option<CellValue>> = match rows.next() {
        Some(header) => header.iter().map(cell_from_data).collect(),
        None => return Sheet::default(),
    };
    let columns = header_names(header_cells.into_iter().map(|cell| cell.map(|c| c.to_string())));

    let records = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    drop_empty_rows(Sheet::from_records(columns, records))
}

fn cell_from_data(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Decodes CSV or TSV content. Cells that read as plain numbers become
/// [`CellValue::Number`], the way a spreadsheet would have stored them.
pub fn decode_delimited(bytes: &[u8], separator: u8) -> PipelineResult<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns = header_names(
        reader
            .headers()?
            .iter()
            .map(|h| Some(h.to_string()))
            .collect::<Vec<_>>(),
    );

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(cell_from_text).collect());
    }

    Ok(drop_empty_rows(Sheet::from_records(columns, records)))
}

fn cell_from_text(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(raw.to_string())),
    }
}

/// Trims header names, fills blanks with `Column N` and suffixes repeated
/// names with `_1`, `_2`, … so every column key is unique, including
/// against headers that already carry such a suffix.
fn header_names(raw: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    let mut emitted: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, header)| {
            let base = match header.map(|h| h.trim().to_string()) {
                Some(h) if !h.is_empty() => h,
                _ => format!("Column {}", i + 1),
            };
            let mut name = base.clone();
            if emitted.contains(&name) {
                let suffix = next_suffix.entry(base.clone()).or_insert(1);
                loop {
                    name = format!("{}_{}", base, suffix);
                    *suffix += 1;
                    if !emitted.contains(&name) {
                        break;
                    }
                }
                debug!("Renamed repeated header '{}' to '{}'", base, name);
            }
            emitted.insert(name.clone());
            name
        })
        .collect()
}

fn drop_empty_rows(mut sheet: Sheet) -> Sheet {
    let before = sheet.rows.len();
    sheet.rows.retain(|row: &RawRow| !is_empty_row(row));
    if sheet.rows.len() != before {
        debug!("Dropped {} empty rows", before - sheet.rows.len());
    }
    sheet
}
