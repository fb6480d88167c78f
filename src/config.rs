//! Configuration handling for sheetdiff

use std::path::{Path, PathBuf};

use crate::error::{Result, SheetDiffError};
use crate::model::DEFAULT_KEY_CANDIDATES;

/// Similarity cutoff used when `FUZZY_THRESHOLD` is not set
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.9;

/// Output directory used when `OUTPUT_DIR` is not set
pub const DEFAULT_OUTPUT_DIR: &str = "comparisons_output";

/// Report file name used when `OUTPUT_FILE` is not set
pub const DEFAULT_OUTPUT_FILE: &str = "comparison_report.xlsx";

/// Options controlling how two cell values are judged equal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompareOptions {
    /// Ignore case when comparing string values
    pub ignore_case: bool,
    /// Ignore leading/trailing whitespace in string values
    pub ignore_whitespace: bool,
    /// Tolerance for numeric comparisons
    pub numeric_tolerance: Option<f64>,
}

/// Unvalidated settings, one field per environment variable.
///
/// Every field is the raw string as found in the environment (or on the
/// command line); [`Config::resolve`] turns it into a validated [`Config`].
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub folder_a: Option<String>,
    pub folder_b: Option<String>,
    pub output_dir: Option<String>,
    pub output_file: Option<String>,
    pub fuzzy_threshold: Option<String>,
    pub key_columns: Option<String>,
    pub ignore_case: Option<String>,
    pub ignore_whitespace: Option<String>,
    pub numeric_tolerance: Option<String>,
}

impl RawConfig {
    /// Read settings through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            folder_a: lookup("FOLDER_A"),
            folder_b: lookup("FOLDER_B"),
            output_dir: lookup("OUTPUT_DIR"),
            output_file: lookup("OUTPUT_FILE"),
            fuzzy_threshold: lookup("FUZZY_THRESHOLD"),
            key_columns: lookup("KEY_COLUMNS"),
            ignore_case: lookup("IGNORE_CASE"),
            ignore_whitespace: lookup("IGNORE_WHITESPACE"),
            numeric_tolerance: lookup("NUMERIC_TOLERANCE"),
        }
    }
}

/// Validated configuration for one comparison run
#[derive(Debug, Clone)]
pub struct Config {
    /// Baseline folder
    pub folder_a: PathBuf,
    /// Folder compared against the baseline
    pub folder_b: PathBuf,
    /// Directory receiving the report workbook
    pub output_dir: PathBuf,
    /// File name of the report inside `output_dir`
    pub output_file: String,
    /// Minimum similarity for a fuzzy filename match
    pub fuzzy_threshold: f64,
    /// Candidate identifier column names, in priority order
    pub key_candidates: Vec<String>,
    /// Cell comparison options
    pub compare: CompareOptions,
}

impl Config {
    /// Create a configuration with defaults for everything but the folders
    pub fn new(folder_a: PathBuf, folder_b: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            folder_a,
            folder_b,
            output_dir,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            key_candidates: DEFAULT_KEY_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            compare: CompareOptions::default(),
        }
    }

    /// Validate raw settings.
    ///
    /// Folders must exist and be directories. The output directory is not
    /// touched here; it is created when the report is written.
    pub fn resolve(raw: RawConfig) -> Result<Self> {
        let folder_a = required_dir("FOLDER_A", raw.folder_a)?;
        let folder_b = required_dir("FOLDER_B", raw.folder_b)?;

        let output_dir = match non_empty(raw.output_dir) {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_OUTPUT_DIR),
        };

        let mut config = Config::new(folder_a, folder_b, output_dir);

        if let Some(name) = non_empty(raw.output_file) {
            if Path::new(&name).file_name().and_then(|f| f.to_str()) != Some(name.as_str()) {
                return Err(SheetDiffError::Config(format!(
                    "OUTPUT_FILE must be a plain file name, got '{}'",
                    name
                )));
            }
            config = config.with_output_file(name);
        }

        if let Some(value) = non_empty(raw.fuzzy_threshold) {
            config = config.with_fuzzy_threshold(parse_threshold(&value)?);
        }

        if let Some(value) = non_empty(raw.key_columns) {
            let keys: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            if keys.is_empty() {
                return Err(SheetDiffError::Config(
                    "KEY_COLUMNS does not name any column".to_string(),
                ));
            }
            config = config.with_key_candidates(keys);
        }

        if let Some(value) = non_empty(raw.ignore_case) {
            config = config.with_ignore_case(parse_flag("IGNORE_CASE", &value)?);
        }
        if let Some(value) = non_empty(raw.ignore_whitespace) {
            config = config.with_ignore_whitespace(parse_flag("IGNORE_WHITESPACE", &value)?);
        }
        if let Some(value) = non_empty(raw.numeric_tolerance) {
            config = config.with_numeric_tolerance(parse_tolerance(&value)?);
        }

        Ok(config)
    }

    /// Full path of the report workbook
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Set the fuzzy matching threshold
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Set the key column candidates
    pub fn with_key_candidates(mut self, keys: Vec<String>) -> Self {
        self.key_candidates = keys;
        self
    }

    /// Set the report file name
    pub fn with_output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = name.into();
        self
    }

    /// Enable case-insensitive comparison
    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.compare.ignore_case = ignore;
        self
    }

    /// Enable whitespace-insensitive comparison
    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.compare.ignore_whitespace = ignore;
        self
    }

    /// Set numeric tolerance for float comparisons
    pub fn with_numeric_tolerance(mut self, tolerance: f64) -> Self {
        self.compare.numeric_tolerance = Some(tolerance);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_dir(name: &str, value: Option<String>) -> Result<PathBuf> {
    let value = non_empty(value)
        .ok_or_else(|| SheetDiffError::Config(format!("{} is not set", name)))?;
    let path = PathBuf::from(value);

    if !path.exists() {
        return Err(SheetDiffError::Config(format!(
            "{} does not exist: {}",
            name,
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(SheetDiffError::Config(format!(
            "{} is not a directory: {}",
            name,
            path.display()
        )));
    }

    Ok(path)
}

fn parse_threshold(value: &str) -> Result<f64> {
    let threshold: f64 = value.parse().map_err(|_| {
        SheetDiffError::Config(format!("FUZZY_THRESHOLD is not a number: '{}'", value))
    })?;

    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(SheetDiffError::Config(format!(
            "FUZZY_THRESHOLD must be between 0 and 1, got {}",
            threshold
        )));
    }

    Ok(threshold)
}

fn parse_tolerance(value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(SheetDiffError::Config(format!(
            "NUMERIC_TOLERANCE must be a non-negative number, got '{}'",
            value
        ))),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SheetDiffError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
