//! Report workbook with `added`, `removed` and `modified` sheets

use std::path::Path;

use indexmap::IndexSet;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::diff::{DiffResult, ModifiedRow, RowRecord};
use crate::error::{Result, SheetDiffError};
use crate::model::CellValue;

pub const ADDED_SHEET: &str = "added";
pub const REMOVED_SHEET: &str = "removed";
pub const MODIFIED_SHEET: &str = "modified";

/// Leading columns of the added/removed sheets
const RECORD_HEADERS: [&str; 4] = ["file_a", "file_b", "row", "key"];

/// Columns of the modified sheet, one line per changed cell
const MODIFIED_HEADERS: [&str; 8] = [
    "file_a",
    "file_b",
    "key",
    "row_a",
    "row_b",
    "column",
    "old_value",
    "new_value",
];

/// Write the aggregated diff to `path`, creating its directory if needed.
///
/// All three sheets are always present, with a header row even when empty.
pub fn write_report(path: &Path, result: &DiffResult) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SheetDiffError::write(dir, e))?;
    }

    build_workbook(result)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| SheetDiffError::write(path, e))
}

fn build_workbook(result: &DiffResult) -> std::result::Result<Workbook, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    // Fixed creation time so unchanged inputs give byte-identical reports
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    write_records(workbook.add_worksheet(), ADDED_SHEET, &result.added, &header)?;
    write_records(workbook.add_worksheet(), REMOVED_SHEET, &result.removed, &header)?;
    write_modified(workbook.add_worksheet(), &result.modified, &header)?;

    Ok(workbook)
}

fn write_records(
    sheet: &mut Worksheet,
    name: &str,
    records: &[RowRecord],
    header: &Format,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(name)?;

    // Pairs may have different schemas; the sheet holds the union of their columns
    let mut data_columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        for (column, _) in &record.cells {
            data_columns.insert(column.as_str());
        }
    }

    let headers = RECORD_HEADERS.iter().copied().chain(data_columns.iter().copied());
    write_header(sheet, headers, header)?;

    let offset = RECORD_HEADERS.len();
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.source.file_a)?;
        sheet.write_string(row, 1, &record.source.file_b)?;
        sheet.write_number(row, 2, record.source_line as f64)?;
        if let Some(key) = &record.key {
            sheet.write_string(row, 3, key)?;
        }
        for (column, value) in &record.cells {
            if let Some(position) = data_columns.get_index_of(column.as_str()) {
                write_cell(sheet, row, (offset + position) as u16, value)?;
            }
        }
    }

    Ok(())
}

fn write_modified(
    sheet: &mut Worksheet,
    rows: &[ModifiedRow],
    header: &Format,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(MODIFIED_SHEET)?;
    write_header(sheet, MODIFIED_HEADERS.iter().copied(), header)?;

    let mut row = 1u32;
    for modified in rows {
        for change in &modified.changes {
            sheet.write_string(row, 0, &modified.source.file_a)?;
            sheet.write_string(row, 1, &modified.source.file_b)?;
            sheet.write_string(row, 2, &modified.key)?;
            sheet.write_number(row, 3, modified.old_line as f64)?;
            sheet.write_number(row, 4, modified.new_line as f64)?;
            sheet.write_string(row, 5, &change.column)?;
            write_cell(sheet, row, 6, &change.old_value)?;
            write_cell(sheet, row, 7, &change.new_value)?;
            row += 1;
        }
    }

    Ok(())
}

fn write_header<'a>(
    sheet: &mut Worksheet,
    names: impl Iterator<Item = &'a str>,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, name) in names.enumerate() {
        sheet.write_string_with_format(0, col as u16, name, format)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) if f.is_finite() => {
            sheet.write_number(row, col, *f)?;
        }
        other => {
            let text = other.to_string();
            sheet.write_string(row, col, &text)?;
        }
    }
    Ok(())
}
