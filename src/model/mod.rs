//! Data model for tabular data representation

mod key;
mod table;

pub use key::{detect_key_column, KeyColumn, DEFAULT_KEY_CANDIDATES};
pub use table::{normalize_headers, CellValue, Row, Table};
