//! Table loaders for the supported spreadsheet formats

mod csv;
mod excel;

use std::path::Path;

use anyhow::{bail, Result};

use crate::error::SheetDiffError;
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;

/// Trait for loading the first sheet of a file into a Table
pub trait Parser {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for choosing a parser based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(ExcelParser), Box::new(CsvParser)],
        }
    }

    /// Whether some parser accepts this path's extension
    pub fn supports(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        self.parsers.iter().any(|p| p.supports_extension(&ext))
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = extension_of(path);

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Load a file with the appropriate parser.
    ///
    /// Every failure is reported as [`SheetDiffError::Load`].
    pub fn load(&self, path: &Path) -> crate::error::Result<Table> {
        self.get_parser(path)
            .and_then(|parser| parser.parse(path))
            .map_err(|e| SheetDiffError::load(path, &e))
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
