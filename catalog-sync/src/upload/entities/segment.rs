//! Home-screen segments, stored together as one ordered list

use serde::Serialize;

use super::{Entity, RowError, optional, required};
use crate::sheet::Row;
use crate::upload::schema::EntityKind;
use crate::upload::values::{to_bool, to_int, to_str};

mod cols {
    pub const ID: &str = "segmentId";
    pub const TITLE: &str = "title";
    pub const ORDER: &str = "order";
    pub const MODE: &str = "mode";
    pub const TAG: &str = "tag";
    pub const PUBLISHED: &str = "published";
}

const DEFAULT_MODE: &str = "tag";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub mode: String,
    pub tag: Option<String>,
    pub published: bool,
}

impl Entity for Segment {
    const KIND: EntityKind = EntityKind::Segment;

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let id = required(row, cols::ID)?;
        let title = required(row, cols::TITLE)?;

        Ok(Self {
            id,
            title,
            order: to_int(row.get(cols::ORDER), Some(0)).unwrap_or(0),
            mode: to_str(row.get(cols::MODE), Some(DEFAULT_MODE)).unwrap_or_default(),
            tag: optional(row, cols::TAG),
            published: to_bool(row.get(cols::PUBLISHED), true),
        })
    }

    fn identity(&self) -> &str {
        &self.id
    }
}

/// Keep published segments only, ordered by `order`
///
/// The sort is stable: segments sharing an `order` keep their sheet order.
pub fn segment_list(segments: Vec<Segment>) -> Vec<Segment> {
    let mut published: Vec<Segment> = segments.into_iter().filter(|s| s.published).collect();
    published.sort_by_key(|s| s.order);
    published
}
