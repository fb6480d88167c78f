//! CSV file parser

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{normalize_headers, CellValue, Table};

use super::Parser;

/// Parser for CSV files, treated as a single-sheet workbook
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        // Byte records so Latin-1 exports load; invalid UTF-8 becomes U+FFFD
        let headers = csv_reader
            .byte_headers()
            .context("Failed to read CSV headers")?
            .clone();

        if headers.is_empty() {
            return Ok(Table::default());
        }

        let mut table = Table::new(normalize_headers(headers.iter().map(String::from_utf8_lossy)));

        for (line_num, result) in csv_reader.byte_records().enumerate() {
            // +2 for 1-indexing and header
            let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?;
            let cells: Vec<CellValue> = record
                .iter()
                .map(|field| parse_cell_value(&String::from_utf8_lossy(field)))
                .collect();
            table.add_row(cells, line_num + 2);
        }

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("csv")
    }
}

/// Parse a string value into a CellValue with type inference
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    CellValue::String(Cow::Owned(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("   "), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("FALSE"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.25"), CellValue::Float(3.25));
        assert_eq!(
            parse_cell_value("2024-02-29"),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(
            parse_cell_value(" hello "),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "id,name,name\n1,Ann,A\n,,\n2,Bob\n").unwrap();

        let table = CsvParser.parse(&path).unwrap();

        assert_eq!(table.columns, vec!["id", "name", "name.1"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].source_line, 4);
        assert_eq!(
            table.rows[1].cells,
            vec![CellValue::Int(2), CellValue::from("Bob"), CellValue::Null]
        );
    }

    #[test]
    fn test_latin1_file_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("municipios.csv");
        // "Código,nombre\n5,Bogotá\n" encoded as Latin-1
        std::fs::write(&path, b"C\xf3digo,nombre\n5,Bogot\xe1\n6,Cali\n").unwrap();

        let table = CsvParser.parse(&path).unwrap();

        assert_eq!(table.columns, vec!["C\u{fffd}digo", "nombre"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells[1], CellValue::from("Bogot\u{fffd}"));
        assert_eq!(table.rows[1].cells, vec![CellValue::Int(6), CellValue::from("Cali")]);
    }
}
