//! Diff engine for comparing tables

pub mod cell_diff;
mod row_diff;

use tracing::warn;

use crate::config::CompareOptions;
use crate::model::{CellValue, KeyColumn, Row, Table};

pub use cell_diff::CellComparator;
pub use row_diff::{Alignment, RowMatcher};

/// A column present in both tables, with its position on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedColumn {
    pub name: String,
    pub old_index: usize,
    pub new_index: usize,
}

/// Columns present in both tables, in old table order
pub fn shared_columns(old_table: &Table, new_table: &Table) -> Vec<SharedColumn> {
    old_table
        .columns
        .iter()
        .enumerate()
        .filter_map(|(old_index, name)| {
            new_table.column_index(name).map(|new_index| SharedColumn {
                name: name.clone(),
                old_index,
                new_index,
            })
        })
        .collect()
}

/// The files a diff entry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub file_a: String,
    pub file_b: String,
}

impl SourceFiles {
    pub fn new(file_a: impl Into<String>, file_b: impl Into<String>) -> Self {
        Self {
            file_a: file_a.into(),
            file_b: file_b.into(),
        }
    }
}

/// A change to a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub column: String,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

/// A whole row that exists on one side only
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub source: SourceFiles,
    /// Line of the row in the file it comes from
    pub source_line: usize,
    /// Key value, when the pair was aligned by key
    pub key: Option<String>,
    /// The row as `(column, value)` pairs in the table's column order
    pub cells: Vec<(String, CellValue)>,
}

/// A keyed row whose non-key values differ
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedRow {
    pub source: SourceFiles,
    pub key: String,
    pub old_line: usize,
    pub new_line: usize,
    pub changes: Vec<CellChange>,
}

/// Statistics about the diff of one pair
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub rows_added: usize,
    pub rows_removed: usize,
    pub rows_modified: usize,
    pub rows_unchanged: usize,
    pub cells_changed: usize,
    pub old_row_count: usize,
    pub new_row_count: usize,
    pub duplicate_keys: usize,
}

impl DiffStats {
    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.rows_added > 0 || self.rows_removed > 0 || self.rows_modified > 0
    }
}

/// Differences found in one pair of tables
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PairDiff {
    pub added: Vec<RowRecord>,
    pub removed: Vec<RowRecord>,
    pub modified: Vec<ModifiedRow>,
    pub stats: DiffStats,
}

impl PairDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Differences accumulated over every compared pair
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DiffResult {
    pub added: Vec<RowRecord>,
    pub removed: Vec<RowRecord>,
    pub modified: Vec<ModifiedRow>,
}

impl DiffResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the entries of one pair, keeping pair order
    pub fn extend(&mut self, pair: PairDiff) {
        self.added.extend(pair.added);
        self.removed.extend(pair.removed);
        self.modified.extend(pair.modified);
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }
}

/// Main diff engine
pub struct DiffEngine {
    cell_comparator: CellComparator,
}

impl DiffEngine {
    /// Create a new diff engine with comparison options
    pub fn new(options: CompareOptions) -> Self {
        Self {
            cell_comparator: CellComparator::new(options),
        }
    }

    /// Compare two tables.
    ///
    /// With a key column rows are aligned by key and shared rows are checked
    /// for modified values; without one rows are aligned by content and no
    /// row is ever reported as modified.
    pub fn diff(
        &self,
        source: &SourceFiles,
        old_table: &Table,
        new_table: &Table,
        key: Option<&KeyColumn>,
    ) -> PairDiff {
        let shared = shared_columns(old_table, new_table);
        let matcher = RowMatcher::new(&shared, self.cell_comparator);

        let alignment = match key {
            Some(key) => matcher.match_by_key(old_table, new_table, key),
            None => matcher.match_by_content(old_table, new_table),
        };

        if alignment.duplicate_keys > 0 {
            warn!(
                file_a = %source.file_a,
                file_b = %source.file_b,
                duplicates = alignment.duplicate_keys,
                "repeated key values; later occurrences compared by content"
            );
        }

        let mut result = PairDiff::default();
        result.stats.old_row_count = old_table.row_count();
        result.stats.new_row_count = new_table.row_count();
        result.stats.duplicate_keys = alignment.duplicate_keys;

        for &(old_idx, new_idx) in &alignment.matched {
            let old_row = &old_table.rows[old_idx];
            let new_row = &new_table.rows[new_idx];

            let changes = match key {
                Some(key) => self.compare_row_cells(&shared, key, old_row, new_row),
                None => Vec::new(),
            };

            if changes.is_empty() {
                result.stats.rows_unchanged += 1;
                continue;
            }

            result.stats.rows_modified += 1;
            result.stats.cells_changed += changes.len();
            result.modified.push(ModifiedRow {
                source: source.clone(),
                key: key.map(|k| k.old_key(old_row)).unwrap_or_default(),
                old_line: old_row.source_line,
                new_line: new_row.source_line,
                changes,
            });
        }

        for &old_idx in &alignment.removed {
            let row = &old_table.rows[old_idx];
            result.removed.push(RowRecord {
                source: source.clone(),
                source_line: row.source_line,
                key: key.map(|k| k.old_key(row)),
                cells: named_cells(old_table, row),
            });
        }
        result.stats.rows_removed = result.removed.len();

        for &new_idx in &alignment.added {
            let row = &new_table.rows[new_idx];
            result.added.push(RowRecord {
                source: source.clone(),
                source_line: row.source_line,
                key: key.map(|k| k.new_key(row)),
                cells: named_cells(new_table, row),
            });
        }
        result.stats.rows_added = result.added.len();

        result
    }

    /// Compare the non-key cells two rows share
    fn compare_row_cells(
        &self,
        shared: &[SharedColumn],
        key: &KeyColumn,
        old_row: &Row,
        new_row: &Row,
    ) -> Vec<CellChange> {
        shared
            .iter()
            .filter(|column| column.name != key.name)
            .filter_map(|column| {
                let old_value = old_row.value(column.old_index);
                let new_value = new_row.value(column.new_index);
                if self.cell_comparator.equal(old_value, new_value) {
                    None
                } else {
                    Some(CellChange {
                        column: column.name.clone(),
                        old_value: old_value.clone(),
                        new_value: new_value.clone(),
                    })
                }
            })
            .collect()
    }
}

fn named_cells(table: &Table, row: &Row) -> Vec<(String, CellValue)> {
    table
        .named_cells(row)
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
