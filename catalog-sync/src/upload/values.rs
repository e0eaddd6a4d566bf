//! Cell value coercion
//!
//! Every function here is total: a malformed cell degrades to the supplied
//! default instead of failing, so one bad cell never aborts an upload.

use crate::sheet::{Cell, whole_float};

/// Tokens accepted as `true` (compared after trim + lowercase)
const TRUTHY: &[&str] = &["true", "1", "yes", "y", "t"];

/// Named difficulty levels
const DIFFICULTY_LEVELS: &[(&str, i64)] = &[
    ("easy", 1),
    ("medium", 2),
    ("hard", 3),
    ("very hard", 4),
    ("expert", 5),
];

const DEFAULT_DIFFICULTY: i64 = 1;

/// Trimmed, non-empty text of a cell, else `default`
pub fn to_str(cell: &Cell, default: Option<&str>) -> Option<String> {
    cell.as_text()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| default.map(str::to_string))
}

/// Integer value of a cell, else `default`
///
/// Text is parsed as an integer first, then as a float truncated toward zero.
pub fn to_int(cell: &Cell, default: Option<i64>) -> Option<i64> {
    let parsed = match cell {
        Cell::Empty => None,
        Cell::Int(i) => Some(*i),
        Cell::Float(f) => truncate(*f),
        Cell::Bool(b) => Some(i64::from(*b)),
        Cell::Text(s) => parse_int(s),
    };

    parsed.or(default)
}

/// Boolean value of a cell, else `default`
pub fn to_bool(cell: &Cell, default: bool) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Empty => default,
        other => match other.as_text() {
            Some(text) => {
                let token = text.trim().to_lowercase();
                if token.is_empty() {
                    default
                } else if TRUTHY.contains(&token.as_str()) {
                    true
                } else {
                    default
                }
            }
            None => default,
        },
    }
}

/// Split `a;b;c` into trimmed, non-empty pieces
pub fn to_string_list(cell: &Cell) -> Vec<String> {
    match to_str(cell, None) {
        Some(s) => s
            .split(';')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Difficulty level from a number or a named level
pub fn to_difficulty(cell: &Cell) -> i64 {
    let level = match cell {
        Cell::Int(i) => Some(*i),
        Cell::Float(f) => truncate(*f),
        Cell::Text(s) => {
            let name = s.trim().to_lowercase();
            DIFFICULTY_LEVELS
                .iter()
                .find(|(label, _)| *label == name)
                .map(|(_, level)| *level)
                .or_else(|| parse_int(&name))
        }
        Cell::Empty | Cell::Bool(_) => None,
    };

    level.unwrap_or(DEFAULT_DIFFICULTY)
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(truncate))
}

/// Truncate toward zero; `None` for NaN, infinities and out-of-range values
fn truncate(f: f64) -> Option<i64> {
    whole_float(f.trunc())
}
