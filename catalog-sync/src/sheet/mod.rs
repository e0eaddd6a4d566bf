//! Tabular input: workbook sheets as rows of raw cells

mod cell;
mod xlsx;

pub use cell::{Cell, Row};
pub use xlsx::XlsxSource;

pub(crate) use cell::whole_float;

use anyhow::Result;

/// A named collection of sheets that can be read row by row
pub trait TabularSource {
    /// Names of all sheets, in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Read every non-blank data row of a sheet
    fn read_sheet(&mut self, name: &str) -> Result<Vec<Row>>;

    /// Find the first sheet matching one of the candidate names
    ///
    /// Exact matches are preferred; otherwise the comparison ignores case and
    /// surrounding whitespace.
    fn resolve_sheet(&self, candidates: &[&str]) -> Option<String> {
        let names = self.sheet_names();

        for candidate in candidates {
            if let Some(name) = names.iter().find(|n| n.as_str() == *candidate) {
                return Some(name.clone());
            }
        }

        for candidate in candidates {
            let wanted = candidate.trim().to_lowercase();
            if let Some(name) = names.iter().find(|n| n.trim().to_lowercase() == wanted) {
                return Some(name.clone());
            }
        }

        None
    }
}

/// In-memory source for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySource {
    sheets: Vec<(String, Vec<Row>)>,
    pub reads: Vec<String>,
}

#[cfg(test)]
impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }
}

#[cfg(test)]
impl TabularSource for MemorySource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Row>> {
        self.reads.push(name.to_string());
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| anyhow::anyhow!("No sheet named '{}'", name))
    }
}
