//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};

static NULL_CELL: CellValue = CellValue::Null;

/// A cell value with type information
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Convert to a display string. Null renders as an empty string.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// Compare with numeric tolerance
    pub fn equals_with_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (CellValue::Float(a), CellValue::Float(b)) => (a - b).abs() <= tolerance,
            (CellValue::Int(a), CellValue::Float(b)) => ((*a as f64) - b).abs() <= tolerance,
            (CellValue::Float(a), CellValue::Int(b)) => (a - (*b as f64)).abs() <= tolerance,
            (CellValue::Int(a), CellValue::Int(b)) => ((*a as f64) - (*b as f64)).abs() <= tolerance,
            _ => self == other,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed, header is line 1)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Cell at `index`, or Null when the row is shorter
    pub fn value(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&NULL_CELL)
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_null)
    }
}

/// A table loaded from the first worksheet of a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column headers, unique within the table
    pub columns: Vec<String>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with the given headers
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding or truncating it to the column count.
    /// Blank rows are dropped.
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        cells.resize(self.columns.len(), CellValue::Null);
        let row = Row::new(cells, source_line);
        if !row.is_blank() {
            self.rows.push(row);
        }
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate a row as `(column, value)` pairs
    pub fn named_cells<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        self.columns
            .iter()
            .enumerate()
            .map(move |(i, name)| (name.as_str(), row.value(i)))
    }
}

/// Make header names unique and non-empty.
///
/// Blank headers become `ColumnN` (1-based position); repeated names get a
/// `.1`, `.2`, ... suffix in order of appearance.
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers: Vec<String> = Vec::new();

    for (i, name) in raw.into_iter().enumerate() {
        let name = name.as_ref().trim();
        let base = if name.is_empty() {
            format!("Column{}", i + 1)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }

    headers
}
