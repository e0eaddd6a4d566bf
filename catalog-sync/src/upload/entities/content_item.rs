//! Content items (`content_items/{itemId}`)

use serde::Serialize;

use super::{Entity, RowError, document_id, optional, required, text};
use crate::sheet::Row;
use crate::upload::schema::EntityKind;
use crate::upload::values::{to_bool, to_difficulty, to_int};

mod cols {
    pub const ID: &str = "itemId";
    pub const PRODUCT_ID: &str = "productId";
    pub const TYPE: &str = "type";
    pub const TOPIC_ID: &str = "topicId";
    pub const LEVEL: &str = "level";
    pub const LEVEL_GOAL: &str = "levelGoal";
    pub const LEVEL_BENEFIT: &str = "levelBenefit";
    pub const ANCHOR_GROUP: &str = "anchorGroup";
    pub const ANCHOR: &str = "anchor";
    pub const INTENT: &str = "intent";
    pub const DIFFICULTY: &str = "difficulty";
    pub const CONTENT: &str = "content";
    pub const WORD_COUNT: &str = "wordCount";
    pub const REUSABLE: &str = "reusable";
    pub const SOURCE_TYPE: &str = "sourceType";
    pub const SOURCE: &str = "source";
    pub const SOURCE_URL: &str = "sourceUrl";
    pub const VERSION: &str = "version";
    pub const PUSH_ORDER: &str = "pushOrder";
    pub const STORAGE_FILE: &str = "storageFile";
    pub const SEQ: &str = "seq";
    pub const IS_PREVIEW: &str = "isPreview";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(skip)]
    pub item_id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub topic_id: Option<String>,
    pub level: Option<String>,
    pub level_goal: Option<String>,
    pub level_benefit: Option<String>,
    pub anchor_group: Option<String>,
    pub anchor: String,
    pub intent: String,
    pub difficulty: i64,
    pub content: String,
    pub word_count: Option<i64>,
    pub reusable: bool,
    pub source_type: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub version: Option<String>,
    pub push_order: Option<i64>,
    pub storage_file: Option<String>,
    pub seq: i64,
    pub is_preview: bool,
}

impl Entity for ContentItem {
    const KIND: EntityKind = EntityKind::ContentItem;

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let item_id = document_id(row, cols::ID)?;
        let product_id = required(row, cols::PRODUCT_ID)?;

        Ok(Self {
            item_id,
            product_id,
            kind: optional(row, cols::TYPE),
            topic_id: optional(row, cols::TOPIC_ID),
            level: optional(row, cols::LEVEL),
            level_goal: optional(row, cols::LEVEL_GOAL),
            level_benefit: optional(row, cols::LEVEL_BENEFIT),
            anchor_group: optional(row, cols::ANCHOR_GROUP),
            anchor: text(row, cols::ANCHOR),
            intent: text(row, cols::INTENT),
            difficulty: to_difficulty(row.get(cols::DIFFICULTY)),
            content: text(row, cols::CONTENT),
            word_count: to_int(row.get(cols::WORD_COUNT), None),
            reusable: to_bool(row.get(cols::REUSABLE), false),
            source_type: optional(row, cols::SOURCE_TYPE),
            source: optional(row, cols::SOURCE),
            source_url: optional(row, cols::SOURCE_URL),
            version: optional(row, cols::VERSION),
            push_order: to_int(row.get(cols::PUSH_ORDER), None),
            storage_file: optional(row, cols::STORAGE_FILE),
            seq: to_int(row.get(cols::SEQ), Some(0)).unwrap_or(0),
            is_preview: to_bool(row.get(cols::IS_PREVIEW), false),
        })
    }

    fn identity(&self) -> &str {
        &self.item_id
    }
}
