//! Error kinds surfaced by a comparison run

use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the library.
pub type Result<T> = std::result::Result<T, SheetDiffError>;

/// Failures that can occur while configuring, loading or writing.
#[derive(Debug, Error)]
pub enum SheetDiffError {
    /// Missing or invalid configuration. Always fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// A spreadsheet could not be read. The affected pair is skipped.
    #[error("failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The report could not be written. Always fatal.
    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl SheetDiffError {
    pub(crate) fn load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        SheetDiffError::Load {
            path: path.into(),
            message: format!("{:#}", err),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SheetDiffError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether the run must stop on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SheetDiffError::Load { .. })
    }
}
