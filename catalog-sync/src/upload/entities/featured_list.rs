//! Featured lists (`featured_lists/{listId}`)
//!
//! The `type` cell decides which of `productIds`, `topicIds` or `ids` the
//! member list is written to. Exactly one of the three is ever present.

use serde::Serialize;

use super::{Entity, RowError, document_id, required};
use crate::sheet::Row;
use crate::upload::schema::EntityKind;
use crate::upload::values::{to_bool, to_int, to_str, to_string_list};

mod cols {
    pub const ID: &str = "listId";
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "type";
    pub const PUBLISHED: &str = "published";
    pub const ORDER: &str = "order";
    pub const IDS: &str = "ids";
    pub const PRODUCT_IDS: &str = "productIds";
    pub const TOPIC_IDS: &str = "topicIds";
}

/// What a featured list points at, from its `type` cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Products,
    Topics,
    /// Unknown or missing type
    Generic,
}

impl ListKind {
    /// Normalize a raw `type` value (trimmed, case-insensitive)
    pub fn parse(raw: Option<&str>) -> Self {
        let normalized = raw.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "products" | "product" | "productids" => Self::Products,
            "topics" | "topic" | "topicids" => Self::Topics,
            _ => Self::Generic,
        }
    }
}

/// The member ids, tagged with the field they are written under
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListMembers {
    ProductIds(Vec<String>),
    TopicIds(Vec<String>),
    Ids(Vec<String>),
}

impl ListMembers {
    /// Pick the destination field and source column for a row
    ///
    /// Typed lists read their dedicated column and fall back to `ids`. Generic
    /// lists take the first non-empty of `productIds`, `topicIds`, `ids`.
    fn from_row(kind: ListKind, row: &Row) -> Self {
        match kind {
            ListKind::Products => {
                Self::ProductIds(first_non_empty(row, &[cols::PRODUCT_IDS, cols::IDS]))
            }
            ListKind::Topics => Self::TopicIds(first_non_empty(row, &[cols::TOPIC_IDS, cols::IDS])),
            ListKind::Generic => Self::Ids(first_non_empty(
                row,
                &[cols::PRODUCT_IDS, cols::TOPIC_IDS, cols::IDS],
            )),
        }
    }
}

/// First column, in priority order, holding at least one id
fn first_non_empty(row: &Row, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|c| to_string_list(row.get(c)))
        .find(|ids| !ids.is_empty())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedList {
    #[serde(skip)]
    pub list_id: String,
    pub title: String,
    pub published: bool,
    pub order: i64,
    #[serde(flatten)]
    pub members: ListMembers,
}

impl Entity for FeaturedList {
    const KIND: EntityKind = EntityKind::FeaturedList;

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let list_id = document_id(row, cols::ID)?;
        let title = required(row, cols::TITLE)?;
        let kind = ListKind::parse(to_str(row.get(cols::TYPE), None).as_deref());

        Ok(Self {
            list_id,
            title,
            published: to_bool(row.get(cols::PUBLISHED), true),
            order: to_int(row.get(cols::ORDER), Some(0)).unwrap_or(0),
            members: ListMembers::from_row(kind, row),
        })
    }

    fn identity(&self) -> &str {
        &self.list_id
    }
}
