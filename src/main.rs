//! sheetdiff - Compare spreadsheets between two folders

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sheetdiff::config::{Config, RawConfig};
use sheetdiff::output::render_summary_to_stdout;
use sheetdiff::SheetDiffError;

/// Compare the spreadsheets of two folders and write an added/removed/modified report.
///
/// Every option can be supplied through the environment variable shown, or a
/// `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "sheetdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Baseline folder
    #[arg(long, env = "FOLDER_A", value_name = "DIR")]
    folder_a: Option<String>,

    /// Folder compared against the baseline
    #[arg(long, env = "FOLDER_B", value_name = "DIR")]
    folder_b: Option<String>,

    /// Directory receiving the report [default: comparisons_output]
    #[arg(long, env = "OUTPUT_DIR", value_name = "DIR")]
    output_dir: Option<String>,

    /// Report file name [default: comparison_report.xlsx]
    #[arg(long, env = "OUTPUT_FILE", value_name = "NAME")]
    output_file: Option<String>,

    /// Minimum filename similarity (0-1) for a fuzzy match [default: 0.9]
    #[arg(long, env = "FUZZY_THRESHOLD", value_name = "SCORE")]
    fuzzy_threshold: Option<String>,

    /// Identifier column candidates, comma-separated, in priority order
    #[arg(long, env = "KEY_COLUMNS", value_name = "NAMES")]
    key_columns: Option<String>,

    /// Ignore case when comparing text
    #[arg(long, env = "IGNORE_CASE", value_name = "BOOL")]
    ignore_case: Option<String>,

    /// Ignore leading/trailing whitespace when comparing text
    #[arg(long, env = "IGNORE_WHITESPACE", value_name = "BOOL")]
    ignore_whitespace: Option<String>,

    /// Tolerance for numeric comparisons (e.g., 0.001)
    #[arg(long, env = "NUMERIC_TOLERANCE", value_name = "NUMBER")]
    numeric_tolerance: Option<String>,
}

impl From<Cli> for RawConfig {
    fn from(cli: Cli) -> Self {
        RawConfig {
            folder_a: cli.folder_a,
            folder_b: cli.folder_b,
            output_dir: cli.output_dir,
            output_file: cli.output_file,
            fuzzy_threshold: cli.fuzzy_threshold,
            key_columns: cli.key_columns,
            ignore_case: cli.ignore_case,
            ignore_whitespace: cli.ignore_whitespace,
            numeric_tolerance: cli.numeric_tolerance,
        }
    }
}

fn main() -> ExitCode {
    // Loaded before logging so RUST_LOG may come from .env
    let env_file = load_env_file();
    init_logging();

    match env_file.and_then(|()| run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.into())?;
    let report = sheetdiff::run(&config)?;

    render_summary_to_stdout(&report).context("Failed to print summary")?;

    Ok(())
}

fn load_env_file() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        // Variables may come from the environment alone
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(SheetDiffError::Config(format!("invalid .env file: {}", e)).into()),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
