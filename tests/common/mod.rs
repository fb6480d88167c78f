#![allow(dead_code)]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use sheetdiff::model::CellValue;

/// Write a single-sheet workbook with a header row
pub fn write_xlsx(path: &Path, headers: &[&str], rows: &[Vec<CellValue>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, value) in row.iter().enumerate() {
            let c = c as u16;
            match value {
                CellValue::Null => {}
                CellValue::Int(i) => {
                    sheet.write_number(r, c, *i as f64).unwrap();
                }
                CellValue::Float(f) => {
                    sheet.write_number(r, c, *f).unwrap();
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b).unwrap();
                }
                other => {
                    let text = other.to_string();
                    sheet.write_string(r, c, &text).unwrap();
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Read every sheet of a workbook as `(name, rows)`
pub fn read_sheets(path: &Path) -> Vec<(String, Vec<Vec<Data>>)> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let names = workbook.sheet_names();

    names
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range.rows().map(|r| r.to_vec()).collect();
            (name, rows)
        })
        .collect()
}

pub fn int(n: i64) -> CellValue {
    CellValue::Int(n)
}

pub fn text(s: &str) -> CellValue {
    CellValue::from(s)
}
