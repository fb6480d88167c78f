//! Pairing of spreadsheet files across two folders

mod similarity;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser::ParserFactory;

pub use similarity::ratio;

/// How a pair of files was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Same stem, ignoring case
    Exact,
    /// Stems similar enough to pass the threshold
    Fuzzy,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Exact => write!(f, "exact"),
            MatchType::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Two files, one from each folder, to be compared
#[derive(Debug, Clone, PartialEq)]
pub struct FilePair {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub match_type: MatchType,
    /// Similarity of the stems; 1.0 for exact matches
    pub score: f64,
}

impl FilePair {
    pub fn name_a(&self) -> String {
        file_name(&self.path_a)
    }

    pub fn name_b(&self) -> String {
        file_name(&self.path_b)
    }
}

/// Result of pairing two file listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Pairs in folder A order
    pub pairs: Vec<FilePair>,
    /// Files of folder A without a partner
    pub unmatched_a: Vec<PathBuf>,
    /// Files of folder B without a partner
    pub unmatched_b: Vec<PathBuf>,
}

/// List the loadable spreadsheet files directly inside `dir`, sorted by name.
///
/// Hidden files and Office lock files (`~$name.xlsx`) are skipped.
pub fn discover_files(dir: &Path, factory: &ParserFactory) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if name.starts_with('.') || name.starts_with("~$") {
            continue;
        }
        if !entry.file_type()?.is_file() && !path.is_file() {
            continue;
        }
        if factory.supports(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Pair files of two folders by name.
///
/// Exact stem matches (case-insensitive) are taken first. The remaining files
/// are paired by stem similarity: every candidate scoring at least `threshold`
/// is considered, highest score first, ties going to the earlier file of A and
/// then the earlier file of B. Each file is used at most once.
pub fn match_files(files_a: &[PathBuf], files_b: &[PathBuf], threshold: f64) -> MatchOutcome {
    let stems_a: Vec<String> = files_a.iter().map(|p| normalized_stem(p)).collect();
    let stems_b: Vec<String> = files_b.iter().map(|p| normalized_stem(p)).collect();

    let mut partner: Vec<Option<(usize, MatchType, f64)>> = vec![None; files_a.len()];
    let mut used_b = vec![false; files_b.len()];

    for (i, stem_a) in stems_a.iter().enumerate() {
        if let Some(j) = (0..files_b.len()).find(|&j| !used_b[j] && stems_b[j] == *stem_a) {
            used_b[j] = true;
            partner[i] = Some((j, MatchType::Exact, 1.0));
        }
    }

    let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
    for (i, stem_a) in stems_a.iter().enumerate() {
        if partner[i].is_some() {
            continue;
        }
        for (j, stem_b) in stems_b.iter().enumerate() {
            if used_b[j] {
                continue;
            }
            let score = ratio(stem_a, stem_b);
            if score >= threshold {
                candidates.push((i, j, score));
            }
        }
    }

    candidates.sort_by(|x, y| {
        y.2.total_cmp(&x.2)
            .then_with(|| x.0.cmp(&y.0))
            .then_with(|| x.1.cmp(&y.1))
    });

    for (i, j, score) in candidates {
        if partner[i].is_none() && !used_b[j] {
            used_b[j] = true;
            partner[i] = Some((j, MatchType::Fuzzy, score));
        }
    }

    let mut outcome = MatchOutcome::default();
    for (i, path_a) in files_a.iter().enumerate() {
        match partner[i] {
            Some((j, match_type, score)) => {
                debug!(
                    file_a = %path_a.display(),
                    file_b = %files_b[j].display(),
                    %match_type,
                    score,
                    "paired files"
                );
                outcome.pairs.push(FilePair {
                    path_a: path_a.clone(),
                    path_b: files_b[j].clone(),
                    match_type,
                    score,
                });
            }
            None => outcome.unmatched_a.push(path_a.clone()),
        }
    }
    outcome.unmatched_b = files_b
        .iter()
        .zip(&used_b)
        .filter(|(_, used)| !**used)
        .map(|(path, _)| path.clone())
        .collect();

    outcome
}

fn normalized_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
