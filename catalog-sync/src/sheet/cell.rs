//! Raw spreadsheet cell and row representation

use std::collections::HashMap;
use std::fmt;

/// A raw cell value as read from a worksheet, before any coercion
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell, missing column, or spreadsheet error value
    #[default]
    Empty,
    /// Text cell (dates are rendered to text by the reader)
    Text(String),
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Native boolean
    Bool(bool),
}

impl Cell {
    /// Check if this cell carries no usable content (blank or whitespace-only text)
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Float(f) => f.is_nan(),
            Cell::Int(_) | Cell::Bool(_) => false,
        }
    }

    /// Textual form of the cell, untrimmed. `None` for empty cells.
    ///
    /// Whole-number floats render without a fractional part so that numeric
    /// identifiers typed into a sheet (stored as `1.0`) come back as `"1"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => {
                if f.is_nan() {
                    None
                } else if let Some(i) = whole_float(*f) {
                    Some(i.to_string())
                } else {
                    Some(f.to_string())
                }
            }
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

/// Return the integer value of a float with no fractional part, if it fits in an i64
pub(crate) fn whole_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "(empty)"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

static EMPTY: Cell = Cell::Empty;

/// One data row of a sheet, keyed by header name
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// 1-based row number within the sheet (header is row 1)
    number: usize,
    cells: HashMap<String, Cell>,
}

impl Row {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            cells: HashMap::new(),
        }
    }

    /// Builder-style insert for fixtures
    #[cfg(test)]
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.insert(column, cell);
        self
    }

    /// Insert a cell. The first value for a duplicated header wins.
    pub fn insert(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        self.cells.entry(column.into()).or_insert_with(|| cell.into());
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Get a cell by column name. Absent columns read as `Cell::Empty`.
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    /// Check whether the header row declared this column at all
    #[cfg(test)]
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Check if every cell in the row is empty
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_empty)
    }
}
