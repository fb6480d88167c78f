//! Cell-level comparison logic

use std::borrow::Cow;

use crate::config::CompareOptions;
use crate::model::CellValue;

/// Cell comparator with configurable options
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    options: CompareOptions,
}

impl CellComparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    /// Compare two cell values for equality
    pub fn equal(&self, a: &CellValue, b: &CellValue) -> bool {
        if a == b {
            return true;
        }

        if let Some(tolerance) = self.options.numeric_tolerance {
            if a.equals_with_tolerance(b, tolerance) {
                return true;
            }
        }

        match (a, b) {
            (CellValue::String(_), CellValue::String(_))
                if self.options.ignore_case || self.options.ignore_whitespace =>
            {
                self.normalize(a) == self.normalize(b)
            }
            _ => false,
        }
    }

    /// Text form of a cell used for content signatures.
    ///
    /// Applies the case and whitespace options; numeric tolerance cannot be
    /// expressed as a signature and is ignored here.
    pub fn normalize<'a>(&self, value: &'a CellValue) -> Cow<'a, str> {
        let mut text = value.display();
        if !matches!(value, CellValue::String(_)) {
            return text;
        }
        if self.options.ignore_whitespace {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                text = Cow::Owned(trimmed.to_string());
            }
        }
        if self.options.ignore_case {
            text = Cow::Owned(text.to_lowercase());
        }
        text
    }
}
