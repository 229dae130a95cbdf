#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use sheetgraph::plan::Plan;

/// A cell written into a generated workbook.
#[derive(Clone, Debug)]
pub enum Cell {
    Num(f64),
    Str(&'static str),
    Empty,
}

/// Builds an xlsx workbook whose first worksheet holds `headers` followed
/// by `rows`.
pub fn xlsx_bytes(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Num(n) => {
                    worksheet.write_number(r, col as u16, *n).unwrap();
                }
                Cell::Str(s) => {
                    worksheet.write_string(r, col as u16, *s).unwrap();
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// The ten-day line chart sample: ISO date text, two measurements and a
/// category.
pub fn line_chart_sample() -> Vec<u8> {
    let dates = [
        "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05",
        "2024-01-06", "2024-01-07", "2024-01-08", "2024-01-09", "2024-01-10",
    ];
    let value1 = [120.0, 340.0, 560.0, 780.0, 910.0, 150.0, 270.0, 390.0, 410.0, 530.0];
    let value2 = [600.0, 720.0, 840.0, 960.0, 1080.0, 1200.0, 1320.0, 1440.0, 510.0, 630.0];
    let category = ["A", "B", "A", "C", "B", "A", "C", "B", "A", "C"];

    let rows: Vec<Vec<Cell>> = (0..10)
        .map(|i| {
            vec![
                Cell::Str(dates[i]),
                Cell::Num(value1[i]),
                Cell::Num(value2[i]),
                Cell::Str(category[i]),
            ]
        })
        .collect();

    xlsx_bytes(&["Date", "Value1", "Value2", "Category"], &rows)
}

pub fn region_rep_sample() -> Vec<u8> {
    xlsx_bytes(
        &["Region", "Rep"],
        &[
            vec![Cell::Str("East"), Cell::Str("Alice")],
            vec![Cell::Str("East"), Cell::Str("Bob")],
            vec![Cell::Str("West"), Cell::Str("Alice")],
        ],
    )
}

pub fn default_plan() -> Plan {
    let mut plan = Plan::default();
    plan.fill_defaults();
    plan
}
