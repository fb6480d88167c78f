//! Colored run summary printed after the report is written

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use tabled::settings::Style;
use tabled::{Table, Tabled};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::matcher::file_name;
use crate::pipeline::{PairSummary, RunReport};

#[derive(Tabled)]
struct PairLine {
    #[tabled(rename = "File A")]
    file_a: String,
    #[tabled(rename = "File B")]
    file_b: String,
    #[tabled(rename = "Match")]
    match_type: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Added")]
    added: usize,
    #[tabled(rename = "Removed")]
    removed: usize,
    #[tabled(rename = "Modified")]
    modified: usize,
}

impl From<&PairSummary> for PairLine {
    fn from(summary: &PairSummary) -> Self {
        Self {
            file_a: summary.pair.name_a(),
            file_b: summary.pair.name_b(),
            match_type: summary.pair.match_type.to_string(),
            score: format!("{:.2}", summary.pair.score),
            key: summary.key.clone().unwrap_or_else(|| "-".to_string()),
            added: summary.stats.rows_added,
            removed: summary.stats.rows_removed,
            modified: summary.stats.rows_modified,
        }
    }
}

/// Print the summary to stdout, colored when it is a terminal
pub fn render_summary_to_stdout(report: &RunReport) -> io::Result<()> {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    render_summary(report, &mut stdout)
}

/// Render the summary of a run
pub fn render_summary(report: &RunReport, writer: &mut dyn WriteColor) -> io::Result<()> {
    if report.compared.is_empty() {
        writeln!(writer, "No pairs compared.")?;
    } else {
        let lines: Vec<PairLine> = report.compared.iter().map(PairLine::from).collect();
        let mut table = Table::new(lines);
        table.with(Style::rounded());
        writeln!(writer, "{}", table)?;
    }

    if !report.skipped.is_empty() {
        writeln!(writer)?;
        with_color(writer, Color::Red, |w| writeln!(w, "Skipped pairs:"))?;
        for skipped in &report.skipped {
            writeln!(
                writer,
                "  {} <-> {}: {}",
                skipped.pair.name_a(),
                skipped.pair.name_b(),
                skipped.reason
            )?;
        }
    }

    write_unmatched(writer, "Only in FOLDER_A:", &report.matches.unmatched_a)?;
    write_unmatched(writer, "Only in FOLDER_B:", &report.matches.unmatched_b)?;

    let totals = report.totals();
    writeln!(writer)?;
    write!(writer, "Summary: ")?;
    with_color(writer, Color::Green, |w| write!(w, "+{} added", totals.rows_added))?;
    write!(writer, ", ")?;
    with_color(writer, Color::Red, |w| write!(w, "-{} removed", totals.rows_removed))?;
    write!(writer, ", ")?;
    with_color(writer, Color::Yellow, |w| write!(w, "~{} modified", totals.rows_modified))?;
    writeln!(writer, " across {} pair(s)", report.compared.len())?;
    writeln!(writer, "Report: {}", report.report_path.display())?;

    Ok(())
}

fn write_unmatched(writer: &mut dyn WriteColor, title: &str, files: &[PathBuf]) -> io::Result<()> {
    if files.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    with_color(writer, Color::Cyan, |w| writeln!(w, "{}", title))?;
    for path in files {
        writeln!(writer, "  {}", file_name(path))?;
    }
    Ok(())
}

fn with_color<F>(writer: &mut dyn WriteColor, color: Color, f: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
{
    writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    let written = f(writer);
    writer.reset()?;
    written
}
