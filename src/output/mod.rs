//! Output of a run: the report workbook and the terminal summary

mod summary;
mod workbook;

pub use summary::{render_summary, render_summary_to_stdout};
pub use workbook::{write_report, ADDED_SHEET, MODIFIED_SHEET, REMOVED_SHEET};
