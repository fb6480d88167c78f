mod common;

use std::fs;
use std::path::Path;

use calamine::Data;
use sheetdiff::matcher::MatchType;
use sheetdiff::model::CellValue;
use sheetdiff::{run, Config};
use tempfile::TempDir;

use common::{int, read_sheets, text, write_xlsx};

struct Fixture {
    _root: TempDir,
    folder_a: std::path::PathBuf,
    folder_b: std::path::PathBuf,
    output: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let folder_a = root.path().join("a");
        let folder_b = root.path().join("b");
        fs::create_dir(&folder_a).unwrap();
        fs::create_dir(&folder_b).unwrap();
        let output = root.path().join("out");

        Self {
            _root: root,
            folder_a,
            folder_b,
            output,
        }
    }

    fn config(&self) -> Config {
        Config::new(self.folder_a.clone(), self.folder_b.clone(), self.output.clone())
    }
}

fn sales(path: &Path, rows: &[(i64, &str, i64)]) {
    let rows: Vec<Vec<CellValue>> = rows
        .iter()
        .map(|&(id, name, qty)| vec![int(id), text(name), int(qty)])
        .collect();
    write_xlsx(path, &["id", "name", "qty"], &rows);
}

/// Folder A and B with one fuzzy pair carrying changes, one identical CSV
/// pair without key, one unreadable pair and one file on each side without
/// a counterpart.
fn populate(fixture: &Fixture) {
    sales(
        &fixture.folder_a.join("ventas_enero.xlsx"),
        &[(1, "Ann", 10), (2, "Bob", 20), (3, "Cy", 30)],
    );
    sales(
        &fixture.folder_b.join("ventas_enera.xlsx"),
        &[(1, "Ann", 10), (3, "Cy", 35), (4, "Dee", 40)],
    );

    let stock = "sku,warehouse,units\nA-1,north,5\nB-2,south,7\n";
    fs::write(fixture.folder_a.join("stock.csv"), stock).unwrap();
    fs::write(fixture.folder_b.join("STOCK.csv"), stock).unwrap();

    fs::write(fixture.folder_a.join("broken.xlsx"), b"garbage").unwrap();
    fs::write(fixture.folder_b.join("broken.xlsx"), b"garbage").unwrap();

    sales(&fixture.folder_a.join("legacy.xlsx"), &[(1, "Ann", 1)]);
    sales(&fixture.folder_b.join("zz_new_quarterly.xlsx"), &[(1, "Ann", 1)]);
}

#[test]
fn full_run_reports_changes_and_skips_unreadable_pairs() {
    let fixture = Fixture::new();
    populate(&fixture);

    let report = run(&fixture.config()).unwrap();

    assert_eq!(report.matches.pairs.len(), 3);
    assert_eq!(report.compared.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pair.name_a(), "broken.xlsx");
    assert_eq!(report.matches.unmatched_a.len(), 1);
    assert_eq!(report.matches.unmatched_b.len(), 1);

    let ventas = report
        .compared
        .iter()
        .find(|s| s.pair.name_a() == "ventas_enero.xlsx")
        .unwrap();
    assert_eq!(ventas.pair.match_type, MatchType::Fuzzy);
    assert_eq!(ventas.key.as_deref(), Some("id"));

    let stock = report
        .compared
        .iter()
        .find(|s| s.pair.name_a() == "stock.csv")
        .unwrap();
    assert_eq!(stock.pair.match_type, MatchType::Exact);
    assert_eq!(stock.key, None);
    assert!(!stock.stats.has_changes());

    let result = &report.result;
    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].key.as_deref(), Some("4"));
    assert_eq!(result.added[0].source.file_b, "ventas_enera.xlsx");
    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.removed[0].key.as_deref(), Some("2"));
    assert_eq!(result.modified.len(), 1);
    assert_eq!(result.modified[0].key, "3");
    assert_eq!(result.modified[0].changes[0].column, "qty");
    assert_eq!(result.modified[0].changes[0].old_value, CellValue::Int(30));
    assert_eq!(result.modified[0].changes[0].new_value, CellValue::Int(35));

    assert!(report.report_path.exists());
    let sheets = read_sheets(&report.report_path);
    let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["added", "removed", "modified"]);

    let added = &sheets[0].1;
    assert_eq!(added.len(), 2);
    assert_eq!(added[1][0], Data::String("ventas_enero.xlsx".to_string()));
    assert_eq!(added[1][1], Data::String("ventas_enera.xlsx".to_string()));
    assert_eq!(added[1][3], Data::String("4".to_string()));

    let modified = &sheets[2].1;
    assert_eq!(modified.len(), 2);
    assert_eq!(modified[1][5], Data::String("qty".to_string()));
    assert_eq!(modified[1][6], Data::Float(30.0));
    assert_eq!(modified[1][7], Data::Float(35.0));
}

#[test]
fn identical_folders_produce_empty_sheets() {
    let fixture = Fixture::new();
    let rows = [(1, "Ann", 10), (2, "Bob", 20)];
    sales(&fixture.folder_a.join("data.xlsx"), &rows);
    sales(&fixture.folder_b.join("data.xlsx"), &rows);

    let report = run(&fixture.config()).unwrap();

    assert_eq!(report.compared.len(), 1);
    assert!(!report.result.has_changes());
    for (_, rows) in read_sheets(&report.report_path) {
        assert_eq!(rows.len(), 1, "only the header row is expected");
    }
}

#[test]
fn raising_the_threshold_prevents_the_fuzzy_pair() {
    let fixture = Fixture::new();
    populate(&fixture);

    let report = run(&fixture.config().with_fuzzy_threshold(0.95)).unwrap();

    assert!(report
        .matches
        .pairs
        .iter()
        .all(|p| p.match_type == MatchType::Exact));
    assert!(!report.result.has_changes());
    assert_eq!(report.matches.unmatched_a.len(), 2);
}

#[test]
fn repeated_runs_write_identical_reports() {
    let fixture = Fixture::new();
    populate(&fixture);

    let first = run(&fixture.config().with_output_file("first.xlsx")).unwrap();
    let second = run(&fixture.config().with_output_file("second.xlsx")).unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(
        fs::read(&first.report_path).unwrap(),
        fs::read(&second.report_path).unwrap()
    );
}

#[test]
fn unwritable_output_aborts_the_run() {
    let fixture = Fixture::new();
    populate(&fixture);
    fs::write(&fixture.output, "a file where the directory should be").unwrap();

    let err = run(&fixture.config()).unwrap_err();

    assert!(matches!(err, sheetdiff::SheetDiffError::Write { .. }));
}

#[test]
fn custom_key_columns_enable_keyed_comparison() {
    let fixture = Fixture::new();
    let headers = ["sku", "name", "price"];
    write_xlsx(
        &fixture.folder_a.join("inventory.xlsx"),
        &headers,
        &[vec![text("A-1"), text("bolt"), int(3)], vec![text("B-2"), text("nut"), int(1)]],
    );
    write_xlsx(
        &fixture.folder_b.join("inventory.xlsx"),
        &headers,
        &[vec![text("A-1"), text("bolt"), int(4)], vec![text("B-2"), text("nut"), int(1)]],
    );

    let by_content = run(&fixture.config()).unwrap();
    assert_eq!(by_content.compared[0].key, None);
    assert_eq!(by_content.result.removed.len(), 1);
    assert_eq!(by_content.result.added.len(), 1);
    assert!(by_content.result.modified.is_empty());

    let by_key = run(&fixture.config().with_key_candidates(vec!["sku".to_string()])).unwrap();
    assert_eq!(by_key.compared[0].key.as_deref(), Some("sku"));
    assert!(by_key.result.added.is_empty());
    assert!(by_key.result.removed.is_empty());
    assert_eq!(by_key.result.modified.len(), 1);
    assert_eq!(by_key.result.modified[0].key, "A-1");
    assert_eq!(by_key.result.modified[0].changes[0].column, "price");
}

#[test]
fn compare_options_relax_keys_and_values() {
    let fixture = Fixture::new();
    let headers = ["codigo", "nombre", "saldo"];
    write_xlsx(
        &fixture.folder_a.join("clientes.xlsx"),
        &headers,
        &[vec![text("A1"), text("Ana"), CellValue::Float(10.0)]],
    );
    write_xlsx(
        &fixture.folder_b.join("clientes.xlsx"),
        &headers,
        &[vec![text("a1"), text(" ANA "), CellValue::Float(10.004)]],
    );

    let strict = run(&fixture.config()).unwrap();
    assert_eq!(strict.result.removed.len(), 1);
    assert_eq!(strict.result.added.len(), 1);

    let relaxed = run(
        &fixture
            .config()
            .with_ignore_case(true)
            .with_ignore_whitespace(true)
            .with_numeric_tolerance(0.01),
    )
    .unwrap();
    assert!(!relaxed.result.has_changes());
    assert_eq!(relaxed.compared[0].stats.rows_unchanged, 1);
}
