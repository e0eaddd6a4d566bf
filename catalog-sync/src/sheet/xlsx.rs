//! Read catalog sheets from a workbook file
//!
//! The first row of every sheet is the header row. Each following row becomes a
//! [`Row`] keyed by header name; blank rows and blank-header columns are dropped.

use anyhow::{Context, Result};
use calamine::{Data, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{Cell, Row, TabularSource};

/// Workbook-backed tabular source (xlsx, xlsm, xls, ods)
pub struct XlsxSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl XlsxSource {
    /// Open a workbook file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSource for XlsxSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Row>> {
        let range = self
            .workbook
            .worksheet_range(name)
            .with_context(|| format!("Failed to read sheet '{}' from {}", name, self.path.display()))?;

        // Row numbers are reported relative to the sheet, not the used range
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let grid: Vec<Vec<Cell>> = range
            .rows()
            .map(|r| r.iter().map(cell_from_data).collect())
            .collect();

        Ok(rows_from_grid(grid, first_row))
    }
}

/// Convert a calamine cell into a raw [`Cell`]
fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Text(format!("{}", dt)),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Turn a header-first grid into keyed rows
///
/// `first_row` is the 0-based sheet index of the grid's first (header) row.
pub(crate) fn rows_from_grid(grid: Vec<Vec<Cell>>, first_row: usize) -> Vec<Row> {
    let mut grid = grid.into_iter();

    let headers: Vec<String> = match grid.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| c.as_text().map(|s| s.trim().to_string()).unwrap_or_default())
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();

    for (idx, cells) in grid.enumerate() {
        // header is sheet row first_row + 1 (1-based), data starts one below
        let mut row = Row::new(first_row + idx + 2);

        for (col_idx, cell) in cells.into_iter().enumerate() {
            let header = headers.get(col_idx).map(|s| s.as_str()).unwrap_or("");

            // Skip empty headers
            if header.is_empty() {
                continue;
            }

            row.insert(header, cell);
        }

        if row.is_blank() {
            continue;
        }

        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_rows_from_grid_headers_and_blanks() {
        let grid = vec![
            vec![Cell::from(" productId "), Cell::from("topicId"), Cell::Empty],
            vec![Cell::from("P1"), Cell::from("T1"), Cell::from("ignored")],
            vec![Cell::Empty, Cell::from("  "), Cell::Empty],
            vec![Cell::from("P2")],
        ];

        let rows = rows_from_grid(grid, 0);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].number(), 2);
        assert_eq!(rows[0].get("productId"), &Cell::Text("P1".into()));
        assert_eq!(rows[0].get("topicId"), &Cell::Text("T1".into()));
        assert!(!rows[0].has_column(""));

        assert_eq!(rows[1].number(), 4);
        assert_eq!(rows[1].get("topicId"), &Cell::Empty);
    }

    #[test]
    fn test_rows_from_grid_empty() {
        assert!(rows_from_grid(Vec::new(), 0).is_empty());
        assert!(rows_from_grid(vec![vec![Cell::from("id")]], 0).is_empty());
    }

    #[test]
    fn test_read_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Products").unwrap();
        sheet.write_string(0, 0, "productId").unwrap();
        sheet.write_string(0, 1, "topicId").unwrap();
        sheet.write_string(0, 2, "trialLimit").unwrap();
        sheet.write_string(0, 3, "published").unwrap();
        sheet.write_string(1, 0, "P1").unwrap();
        sheet.write_string(1, 1, "T1").unwrap();
        sheet.write_number(1, 2, 5.0).unwrap();
        sheet.write_boolean(1, 3, false).unwrap();
        workbook.add_worksheet().set_name("Topics").unwrap();
        workbook.save(&path).unwrap();

        let mut source = XlsxSource::open(&path).unwrap();
        assert_eq!(source.sheet_names(), vec!["Products", "Topics"]);

        let rows = source.read_sheet("Products").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("productId"), &Cell::Text("P1".into()));
        assert_eq!(rows[0].get("trialLimit").as_text(), Some("5".to_string()));
        assert_eq!(rows[0].get("published"), &Cell::Bool(false));

        assert!(source.read_sheet("Topics").unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(XlsxSource::open(dir.path().join("missing.xlsx")).is_err());
    }
}
