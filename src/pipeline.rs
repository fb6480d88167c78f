//! One comparison run: match, load, align, diff, write

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::diff::{DiffEngine, DiffResult, DiffStats, PairDiff, SourceFiles};
use crate::error::{Result, SheetDiffError};
use crate::matcher::{discover_files, match_files, FilePair, MatchOutcome};
use crate::model::detect_key_column;
use crate::output::write_report;
use crate::parser::ParserFactory;

/// Outcome of comparing one pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    pub pair: FilePair,
    /// Key column used for alignment, if any
    pub key: Option<String>,
    pub stats: DiffStats,
}

/// A pair that could not be compared
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPair {
    pub pair: FilePair,
    pub reason: String,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub matches: MatchOutcome,
    pub compared: Vec<PairSummary>,
    pub skipped: Vec<SkippedPair>,
    pub result: DiffResult,
    pub report_path: PathBuf,
}

impl RunReport {
    /// Sum of the statistics of every compared pair
    pub fn totals(&self) -> DiffStats {
        self.compared.iter().fold(DiffStats::default(), |mut acc, s| {
            acc.rows_added += s.stats.rows_added;
            acc.rows_removed += s.stats.rows_removed;
            acc.rows_modified += s.stats.rows_modified;
            acc.rows_unchanged += s.stats.rows_unchanged;
            acc.cells_changed += s.stats.cells_changed;
            acc.old_row_count += s.stats.old_row_count;
            acc.new_row_count += s.stats.new_row_count;
            acc.duplicate_keys += s.stats.duplicate_keys;
            acc
        })
    }
}

/// Run a full comparison and write the report.
///
/// A pair whose files cannot be loaded is logged and skipped; listing a
/// folder or writing the report aborts the run.
pub fn run(config: &Config) -> Result<RunReport> {
    let factory = ParserFactory::new();

    let files_a = list_folder("FOLDER_A", &config.folder_a, &factory)?;
    let files_b = list_folder("FOLDER_B", &config.folder_b, &factory)?;
    info!(folder_a = files_a.len(), folder_b = files_b.len(), "discovered spreadsheets");

    let matches = match_files(&files_a, &files_b, config.fuzzy_threshold);
    info!(
        pairs = matches.pairs.len(),
        threshold = config.fuzzy_threshold,
        "paired files"
    );
    for path in &matches.unmatched_a {
        info!(file = %path.display(), "no counterpart in FOLDER_B");
    }
    for path in &matches.unmatched_b {
        info!(file = %path.display(), "no counterpart in FOLDER_A");
    }

    let engine = DiffEngine::new(config.compare);
    let mut result = DiffResult::new();
    let mut compared = Vec::new();
    let mut skipped = Vec::new();

    for pair in &matches.pairs {
        info!(
            file_a = %pair.name_a(),
            file_b = %pair.name_b(),
            match_type = %pair.match_type,
            score = %format!("{:.2}", pair.score),
            "comparing"
        );

        match compare_pair(&factory, &engine, &config.key_candidates, pair) {
            Ok((diff, key)) => {
                info!(
                    added = diff.stats.rows_added,
                    removed = diff.stats.rows_removed,
                    modified = diff.stats.rows_modified,
                    "pair compared"
                );
                compared.push(PairSummary {
                    pair: pair.clone(),
                    key,
                    stats: diff.stats,
                });
                result.extend(diff);
            }
            Err(err) if !err.is_fatal() => {
                warn!(file_a = %pair.name_a(), file_b = %pair.name_b(), "skipping pair: {}", err);
                skipped.push(SkippedPair {
                    pair: pair.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    let report_path = config.report_path();
    write_report(&report_path, &result)?;
    info!(path = %report_path.display(), "report written");

    Ok(RunReport {
        matches,
        compared,
        skipped,
        result,
        report_path,
    })
}

/// Load both files of a pair and diff them.
/// Returns the diff and the name of the key column used, if any.
pub fn compare_pair(
    factory: &ParserFactory,
    engine: &DiffEngine,
    key_candidates: &[String],
    pair: &FilePair,
) -> Result<(PairDiff, Option<String>)> {
    let old_table = factory.load(&pair.path_a)?;
    let new_table = factory.load(&pair.path_b)?;

    let key = detect_key_column(key_candidates, &old_table, &new_table);
    match &key {
        Some(key) => debug!(key = %key.name, "aligning rows by key column"),
        None => debug!("no key column found; aligning rows by content"),
    }

    let source = SourceFiles::new(pair.name_a(), pair.name_b());
    let diff = engine.diff(&source, &old_table, &new_table, key.as_ref());

    Ok((diff, key.map(|k| k.name)))
}

fn list_folder(name: &str, dir: &std::path::Path, factory: &ParserFactory) -> Result<Vec<PathBuf>> {
    discover_files(dir, factory).map_err(|e| {
        SheetDiffError::Config(format!("cannot read {} ({}): {}", name, dir.display(), e))
    })
}
