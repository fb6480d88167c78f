//! Identifier column detection

use super::table::{Row, Table};

/// Column names tried, in order, when looking for an identifier column
pub const DEFAULT_KEY_CANDIDATES: &[&str] = &[
    "id",
    "ID",
    "Id",
    "codigo",
    "Código",
    "codigo_municipio",
    "codigo_munic",
    "codigoMunicipio",
    "cod",
];

/// The identifier column chosen for one pair of tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
    /// Header name shared by both tables
    pub name: String,
    /// Position of the column in the old (A) table
    pub old_index: usize,
    /// Position of the column in the new (B) table
    pub new_index: usize,
}

impl KeyColumn {
    /// Key value of a row from the old table
    pub fn old_key(&self, row: &Row) -> String {
        row.value(self.old_index).display().into_owned()
    }

    /// Key value of a row from the new table
    pub fn new_key(&self, row: &Row) -> String {
        row.value(self.new_index).display().into_owned()
    }
}

/// Pick the first candidate present as a header in both tables.
///
/// Candidates are tried in list order; header matching is exact.
pub fn detect_key_column<S: AsRef<str>>(
    candidates: &[S],
    old_table: &Table,
    new_table: &Table,
) -> Option<KeyColumn> {
    candidates.iter().find_map(|candidate| {
        let name = candidate.as_ref();
        let old_index = old_table.column_index(name)?;
        let new_index = new_table.column_index(name)?;
        Some(KeyColumn {
            name: name.to_string(),
            old_index,
            new_index,
        })
    })
}
