//! Product documents (`products/{productId}`)
//!
//! `title` falls back to `"{topicId} {level}"` and `titleLower` falls back to
//! the lower-cased resolved title, in that order.

use serde::Serialize;

use super::{Entity, RowError, document_id, optional, required};
use crate::sheet::Row;
use crate::upload::schema::EntityKind;
use crate::upload::values::{to_bool, to_int};

pub(crate) mod cols {
    pub const ID: &str = "productId";
    pub const TOPIC_ID: &str = "topicId";
    pub const LEVEL: &str = "level";
    pub const TITLE: &str = "title";
    pub const TITLE_LOWER: &str = "titleLower";
    pub const ORDER: &str = "order";
    pub const TYPE: &str = "type";
    pub const PUBLISHED: &str = "published";
    pub const LEVEL_GOAL: &str = "levelGoal";
    pub const LEVEL_BENEFIT: &str = "levelBenefit";
    pub const ANCHOR_GROUP: &str = "anchorGroup";
    pub const VERSION: &str = "version";
    pub const COVER_IMAGE_URL: &str = "coverImageUrl";
    pub const COVER_STORAGE_FILE: &str = "coverStorageFile";
    pub const ITEM_COUNT: &str = "itemCount";
    pub const WORD_COUNT_AVG: &str = "wordCountAvg";
    pub const PUSH_STRATEGY: &str = "pushStrategy";
    pub const SOURCE_TYPE: &str = "sourceType";
    pub const SOURCE: &str = "source";
    pub const SOURCE_URL: &str = "sourceUrl";
    pub const SPEC_LABELS: [&str; 4] = ["spec1Label", "spec2Label", "spec3Label", "spec4Label"];
    pub const SPEC_ICONS: [&str; 4] = ["spec1Icon", "spec2Icon", "spec3Icon", "spec4Icon"];
    pub const TRIAL_MODE: &str = "trialMode";
    pub const TRIAL_LIMIT: &str = "trialLimit";
    pub const RELEASE_AT_MS: &str = "releaseAtMs";
    pub const CREATED_AT_MS: &str = "createdAtMs";
}

const DEFAULT_TRIAL_LIMIT: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip)]
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub topic_id: String,
    pub level: Option<String>,
    pub title: String,
    pub title_lower: String,
    pub order: i64,
    pub level_goal: Option<String>,
    pub level_benefit: Option<String>,
    pub anchor_group: Option<String>,
    pub version: Option<String>,
    pub published: bool,
    pub cover_image_url: Option<String>,
    pub cover_storage_file: Option<String>,
    pub item_count: Option<i64>,
    pub word_count_avg: Option<i64>,
    pub push_strategy: Option<String>,
    pub source_type: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub spec1_label: Option<String>,
    pub spec2_label: Option<String>,
    pub spec3_label: Option<String>,
    pub spec4_label: Option<String>,
    pub spec1_icon: Option<String>,
    pub spec2_icon: Option<String>,
    pub spec3_icon: Option<String>,
    pub spec4_icon: Option<String>,
    pub trial_mode: Option<String>,
    pub trial_limit: i64,
    pub release_at_ms: Option<i64>,
    pub created_at_ms: Option<i64>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn from_row(row: &Row) -> Result<Self, RowError> {
        let product_id = document_id(row, cols::ID)?;
        let topic_id = required(row, cols::TOPIC_ID)?;
        let level = optional(row, cols::LEVEL);

        let title = optional(row, cols::TITLE).unwrap_or_else(|| {
            format!("{} {}", topic_id, level.as_deref().unwrap_or(""))
                .trim()
                .to_string()
        });
        // Falls back to the resolved title, never to the raw cell
        let title_lower = optional(row, cols::TITLE_LOWER).unwrap_or_else(|| title.to_lowercase());

        let [spec1_label, spec2_label, spec3_label, spec4_label] =
            cols::SPEC_LABELS.map(|c| optional(row, c));
        let [spec1_icon, spec2_icon, spec3_icon, spec4_icon] =
            cols::SPEC_ICONS.map(|c| optional(row, c));

        Ok(Self {
            product_id,
            kind: optional(row, cols::TYPE),
            topic_id,
            level,
            title,
            title_lower,
            order: to_int(row.get(cols::ORDER), Some(0)).unwrap_or(0),
            level_goal: optional(row, cols::LEVEL_GOAL),
            level_benefit: optional(row, cols::LEVEL_BENEFIT),
            anchor_group: optional(row, cols::ANCHOR_GROUP),
            version: optional(row, cols::VERSION),
            published: to_bool(row.get(cols::PUBLISHED), true),
            cover_image_url: optional(row, cols::COVER_IMAGE_URL),
            cover_storage_file: optional(row, cols::COVER_STORAGE_FILE),
            item_count: to_int(row.get(cols::ITEM_COUNT), None),
            word_count_avg: to_int(row.get(cols::WORD_COUNT_AVG), None),
            push_strategy: optional(row, cols::PUSH_STRATEGY),
            source_type: optional(row, cols::SOURCE_TYPE),
            source: optional(row, cols::SOURCE),
            source_url: optional(row, cols::SOURCE_URL),
            spec1_label,
            spec2_label,
            spec3_label,
            spec4_label,
            spec1_icon,
            spec2_icon,
            spec3_icon,
            spec4_icon,
            trial_mode: optional(row, cols::TRIAL_MODE),
            trial_limit: to_int(row.get(cols::TRIAL_LIMIT), Some(DEFAULT_TRIAL_LIMIT))
                .unwrap_or(DEFAULT_TRIAL_LIMIT),
            release_at_ms: to_int(row.get(cols::RELEASE_AT_MS), None),
            created_at_ms: to_int(row.get(cols::CREATED_AT_MS), None),
        })
    }

    fn identity(&self) -> &str {
        &self.product_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_fallback() {
        let row = Row::new(2)
            .with("productId", "P1")
            .with("topicId", "T1")
            .with("level", "L2");
        let product = Product::from_row(&row).unwrap();

        assert_eq!(product.title, "T1 L2");
        assert_eq!(product.title_lower, "t1 l2");
    }

    #[test]
    fn test_title_lower_follows_explicit_title() {
        let row = Row::new(2)
            .with("productId", "P1")
            .with("topicId", "T1")
            .with("level", "L2")
            .with("title", "Daily English");
        let product = Product::from_row(&row).unwrap();

        assert_eq!(product.title, "Daily English");
        assert_eq!(product.title_lower, "daily english");
    }

    #[test]
    fn test_explicit_title_lower_wins() {
        let row = Row::new(2)
            .with("productId", "P1")
            .with("topicId", "T1")
            .with("title", "Daily English")
            .with("titleLower", "custom");
        assert_eq!(Product::from_row(&row).unwrap().title_lower, "custom");
    }

    #[test]
    fn test_title_without_level() {
        let row = Row::new(2).with("productId", "P1").with("topicId", "T1");
        let product = Product::from_row(&row).unwrap();

        assert_eq!(product.title, "T1");
        assert_eq!(product.level, None);
    }

    #[test]
    fn test_requires_topic() {
        let row = Row::new(9).with("productId", "P1");
        assert_eq!(
            Product::from_row(&row),
            Err(RowError::MissingField {
                row: 9,
                column: "topicId"
            })
        );
    }

    #[test]
    fn test_defaults_and_document_shape() {
        let row = Row::new(2)
            .with("productId", "P1")
            .with("topicId", "T1")
            .with("level", "L1")
            .with("type", "course")
            .with("itemCount", 12.0)
            .with("trialLimit", "not a number")
            .with("spec2Icon", "star")
            .with("releaseAtMs", "1700000000000");
        let product = Product::from_row(&row).unwrap();
        assert_eq!(product.identity(), "P1");
        assert_eq!(product.trial_limit, 3);
        assert_eq!(product.order, 0);
        assert!(product.published);

        let doc = product.to_document().unwrap();
        assert!(!doc.contains_key("productId"));
        assert_eq!(doc["type"], json!("course"));
        assert_eq!(doc["topicId"], json!("T1"));
        assert_eq!(doc["itemCount"], json!(12));
        assert_eq!(doc["wordCountAvg"], json!(null));
        assert_eq!(doc["spec2Icon"], json!("star"));
        assert_eq!(doc["spec1Icon"], json!(null));
        assert_eq!(doc["trialLimit"], json!(3));
        assert_eq!(doc["releaseAtMs"], json!(1_700_000_000_000i64));
        assert_eq!(doc["createdAtMs"], json!(null));
        assert_eq!(doc.len(), 31);
    }
}
