//! Row matching algorithms

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::model::{CellValue, KeyColumn, Row, Table};

use super::cell_diff::CellComparator;
use super::SharedColumn;

/// Separator between cell texts in a content signature
const SIGNATURE_SEPARATOR: char = '\u{1f}';

/// How the rows of two tables line up
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// `(old_index, new_index)` pairs, in old row order
    pub matched: Vec<(usize, usize)>,
    /// Old rows without a partner, in row order
    pub removed: Vec<usize>,
    /// New rows without a partner, in row order
    pub added: Vec<usize>,
    /// Rows whose key was already seen earlier in the same table
    pub duplicate_keys: usize,
}

/// Row matcher over the columns both tables share
pub struct RowMatcher<'a> {
    shared: &'a [SharedColumn],
    comparator: CellComparator,
}

impl<'a> RowMatcher<'a> {
    pub fn new(shared: &'a [SharedColumn], comparator: CellComparator) -> Self {
        Self { shared, comparator }
    }

    /// Align rows by the value of the key column.
    ///
    /// Key values go through the comparator's case and whitespace options.
    /// The first row carrying a key wins. Later rows repeating a key on the
    /// same side are aligned among themselves by content.
    pub fn match_by_key(&self, old_table: &Table, new_table: &Table, key: &KeyColumn) -> Alignment {
        let key_text = |value: &CellValue| self.comparator.normalize(value).into_owned();
        let (old_index, old_dups) =
            index_by_key(&old_table.rows, |row| key_text(row.value(key.old_index)));
        let (new_index, new_dups) =
            index_by_key(&new_table.rows, |row| key_text(row.value(key.new_index)));

        let mut alignment = Alignment {
            duplicate_keys: old_dups.len() + new_dups.len(),
            ..Default::default()
        };

        for (key_value, &old_idx) in &old_index {
            match new_index.get(key_value) {
                Some(&new_idx) => alignment.matched.push((old_idx, new_idx)),
                None => alignment.removed.push(old_idx),
            }
        }
        for (key_value, &new_idx) in &new_index {
            if !old_index.contains_key(key_value) {
                alignment.added.push(new_idx);
            }
        }

        if !old_dups.is_empty() || !new_dups.is_empty() {
            let leftovers = self.match_subsets(old_table, &old_dups, new_table, &new_dups);
            alignment.matched.extend(leftovers.matched);
            alignment.removed.extend(leftovers.removed);
            alignment.added.extend(leftovers.added);
        }

        alignment.matched.sort_unstable();
        alignment.removed.sort_unstable();
        alignment.added.sort_unstable();
        alignment
    }

    /// Align rows by content alone.
    ///
    /// Each old row consumes the first unused new row with the same content
    /// signature. Identical rows are therefore matched as a multiset.
    /// Without shared columns no two rows can be equal, so nothing matches.
    pub fn match_by_content(&self, old_table: &Table, new_table: &Table) -> Alignment {
        let old_rows: Vec<usize> = (0..old_table.row_count()).collect();
        let new_rows: Vec<usize> = (0..new_table.row_count()).collect();
        if self.shared.is_empty() {
            return Alignment {
                removed: old_rows,
                added: new_rows,
                ..Default::default()
            };
        }
        self.match_subsets(old_table, &old_rows, new_table, &new_rows)
    }

    fn match_subsets(
        &self,
        old_table: &Table,
        old_rows: &[usize],
        new_table: &Table,
        new_rows: &[usize],
    ) -> Alignment {
        let mut available: FxHashMap<String, VecDeque<usize>> = FxHashMap::default();
        for &new_idx in new_rows {
            let signature = self.signature(&new_table.rows[new_idx], |c| c.new_index);
            available.entry(signature).or_default().push_back(new_idx);
        }

        let mut alignment = Alignment::default();
        for &old_idx in old_rows {
            let signature = self.signature(&old_table.rows[old_idx], |c| c.old_index);
            match available.get_mut(&signature).and_then(VecDeque::pop_front) {
                Some(new_idx) => alignment.matched.push((old_idx, new_idx)),
                None => alignment.removed.push(old_idx),
            }
        }

        alignment.added = available.into_values().flatten().collect();
        alignment.added.sort_unstable();
        alignment
    }

    fn signature(&self, row: &Row, position: impl Fn(&SharedColumn) -> usize) -> String {
        let mut signature = String::new();
        for column in self.shared {
            let value = row.value(position(column));
            signature.push(type_tag(value));
            signature.push_str(&self.comparator.normalize(value));
            signature.push(SIGNATURE_SEPARATOR);
        }
        signature
    }
}

/// Value class prefixed to each signature cell, so `1` and `"1"` differ
/// exactly as they do under `CellValue` equality. Int and Float share a class.
fn type_tag(value: &CellValue) -> char {
    match value {
        CellValue::Null => '0',
        CellValue::Bool(_) => 'b',
        CellValue::Int(_) | CellValue::Float(_) => 'n',
        CellValue::String(_) => 's',
        CellValue::Date(_) => 'd',
        CellValue::DateTime(_) => 't',
    }
}

/// Index rows by key, keeping the first occurrence.
/// Returns the index and the positions of rows repeating an earlier key.
fn index_by_key(rows: &[Row], key_of: impl Fn(&Row) -> String) -> (IndexMap<String, usize>, Vec<usize>) {
    let mut index = IndexMap::with_capacity(rows.len());
    let mut duplicates = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let key = key_of(row);
        if index.contains_key(&key) {
            duplicates.push(idx);
        } else {
            index.insert(key, idx);
        }
    }

    (index, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for (i, cells) in rows.into_iter().enumerate() {
            table.add_row(cells, i + 2);
        }
        table
    }

    fn int(n: i64) -> CellValue {
        CellValue::Int(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn shared(names: &[&str]) -> Vec<SharedColumn> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| SharedColumn {
                name: n.to_string(),
                old_index: i,
                new_index: i,
            })
            .collect()
    }

    fn key() -> KeyColumn {
        KeyColumn {
            name: "id".to_string(),
            old_index: 0,
            new_index: 0,
        }
    }

    #[test]
    fn test_match_by_key() {
        let old = table(
            &["id", "v"],
            vec![
                vec![int(1), text("a")],
                vec![int(2), text("b")],
                vec![int(3), text("c")],
            ],
        );
        let new = table(
            &["id", "v"],
            vec![
                vec![int(3), text("c")],
                vec![int(1), text("a")],
                vec![int(4), text("d")],
            ],
        );
        let columns = shared(&["id", "v"]);
        let matcher = RowMatcher::new(&columns, CellComparator::default());

        let alignment = matcher.match_by_key(&old, &new, &key());

        assert_eq!(alignment.matched, vec![(0, 1), (2, 0)]);
        assert_eq!(alignment.removed, vec![1]);
        assert_eq!(alignment.added, vec![2]);
        assert_eq!(alignment.duplicate_keys, 0);
    }

    #[test]
    fn test_duplicate_keys_fall_back_to_content() {
        let old = table(
            &["id", "v"],
            vec![
                vec![int(1), text("a")],
                vec![int(1), text("dup")],
                vec![int(1), text("gone")],
            ],
        );
        let new = table(
            &["id", "v"],
            vec![
                vec![int(1), text("a")],
                vec![int(1), text("dup")],
                vec![int(1), text("fresh")],
            ],
        );
        let columns = shared(&["id", "v"]);
        let matcher = RowMatcher::new(&columns, CellComparator::default());

        let alignment = matcher.match_by_key(&old, &new, &key());

        assert_eq!(alignment.matched, vec![(0, 0), (1, 1)]);
        assert_eq!(alignment.removed, vec![2]);
        assert_eq!(alignment.added, vec![2]);
        assert_eq!(alignment.duplicate_keys, 4);
    }

    #[test]
    fn test_match_by_content_is_a_multiset() {
        let old = table(
            &["name", "qty"],
            vec![
                vec![text("x"), int(1)],
                vec![text("x"), int(1)],
                vec![text("y"), int(2)],
            ],
        );
        let new = table(
            &["name", "qty"],
            vec![
                vec![text("y"), int(2)],
                vec![text("x"), int(1)],
                vec![text("z"), CellValue::Null],
            ],
        );
        let columns = shared(&["name", "qty"]);
        let matcher = RowMatcher::new(&columns, CellComparator::default());

        let alignment = matcher.match_by_content(&old, &new);

        assert_eq!(alignment.matched, vec![(0, 1), (2, 0)]);
        assert_eq!(alignment.removed, vec![1]);
        assert_eq!(alignment.added, vec![2]);
    }

    #[test]
    fn test_content_signature_keeps_value_class() {
        let old = table(&["code"], vec![vec![int(1)], vec![int(2)]]);
        let new = table(&["code"], vec![vec![text("1")], vec![CellValue::Float(2.0)]]);
        let columns = shared(&["code"]);
        let matcher = RowMatcher::new(&columns, CellComparator::default());

        let alignment = matcher.match_by_content(&old, &new);

        assert_eq!(alignment.matched, vec![(1, 1)]);
        assert_eq!(alignment.removed, vec![0]);
        assert_eq!(alignment.added, vec![0]);
    }

    #[test]
    fn test_without_shared_columns_nothing_matches() {
        let old = table(&["name"], vec![vec![text("x")], vec![text("y")]]);
        let new = table(&["nombre"], vec![vec![text("p")], vec![text("q")]]);
        let matcher = RowMatcher::new(&[], CellComparator::default());

        let alignment = matcher.match_by_content(&old, &new);

        assert!(alignment.matched.is_empty());
        assert_eq!(alignment.removed, vec![0, 1]);
        assert_eq!(alignment.added, vec![0, 1]);
    }

    #[test]
    fn test_key_values_follow_case_option() {
        let old = table(&["id", "v"], vec![vec![text("A1"), text("a")]]);
        let new = table(&["id", "v"], vec![vec![text("a1 "), text("a")]]);
        let columns = shared(&["id", "v"]);

        let strict = RowMatcher::new(&columns, CellComparator::default());
        let alignment = strict.match_by_key(&old, &new, &key());
        assert!(alignment.matched.is_empty());

        let relaxed = RowMatcher::new(
            &columns,
            CellComparator::new(CompareOptions {
                ignore_case: true,
                ignore_whitespace: true,
                numeric_tolerance: None,
            }),
        );
        let alignment = relaxed.match_by_key(&old, &new, &key());
        assert_eq!(alignment.matched, vec![(0, 0)]);
        assert!(alignment.removed.is_empty());
        assert!(alignment.added.is_empty());
    }
}
