//! sheetdiff - Compare spreadsheets between two folders
//!
//! Files of two folders are paired by name (exactly or by similarity), the
//! first worksheet of each pair is loaded, rows are aligned on an identifier
//! column when one is found, and the added, removed and modified rows of
//! every pair are collected into a single report workbook.

pub mod config;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use diff::DiffResult;
pub use error::{Result, SheetDiffError};
pub use model::Table;
pub use pipeline::{run, RunReport};
