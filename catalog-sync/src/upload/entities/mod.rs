//! Typed catalog entities built from sheet rows
//!
//! Each entity knows its required columns, defaults and derived fields. A row
//! that lacks a required column, or whose id is not a single path segment,
//! yields a [`RowError`] and produces no write.

mod content_item;
mod featured_list;
mod product;
mod segment;
mod topic;

pub use content_item::ContentItem;
pub use featured_list::FeaturedList;
pub use product::Product;
pub(crate) use product::cols as product_cols;
pub use segment::{Segment, segment_list};
pub use topic::Topic;

use serde::Serialize;
use serde_json::{Map, Value};

use super::schema::EntityKind;
use super::values::to_str;
use crate::sheet::Row;

/// Why a row produced no document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row {row}: missing required field '{column}'")]
    MissingField { row: usize, column: &'static str },

    #[error("row {row}: '{value}' in '{column}' is not a valid document id")]
    InvalidDocumentId {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A catalog record that can be built from one sheet row
pub trait Entity: Serialize + Sized {
    const KIND: EntityKind;

    /// Build the entity from a row, applying defaults and fallbacks
    fn from_row(row: &Row) -> Result<Self, RowError>;

    /// Document id within the entity's collection
    fn identity(&self) -> &str;

    /// Serialize to the field map written to the store
    fn to_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "{} did not serialize to an object: {}",
                Self::KIND,
                other
            ))),
        }
    }
}

/// Trimmed value of a required column
fn required(row: &Row, column: &'static str) -> Result<String, RowError> {
    to_str(row.get(column), None).ok_or(RowError::MissingField {
        row: row.number(),
        column,
    })
}

/// Required column used as a document id
///
/// The id must be a single path segment: no `/`, and not `.` or `..`.
fn document_id(row: &Row, column: &'static str) -> Result<String, RowError> {
    let value = required(row, column)?;
    if value.contains('/') || value == "." || value == ".." {
        return Err(RowError::InvalidDocumentId {
            row: row.number(),
            column,
            value,
        });
    }
    Ok(value)
}

/// Trimmed value of an optional column
fn optional(row: &Row, column: &str) -> Option<String> {
    to_str(row.get(column), None)
}

/// Trimmed value of a text column that defaults to the empty string
fn text(row: &Row, column: &str) -> String {
    to_str(row.get(column), None).unwrap_or_default()
}
