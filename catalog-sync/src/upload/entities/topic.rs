//! Topic documents (`topics/{topicId}`)

use serde::Serialize;

use super::{Entity, RowError, document_id, optional};
use crate::sheet::Row;
use crate::upload::schema::EntityKind;
use crate::upload::values::{to_bool, to_int, to_string_list};

mod cols {
    pub const ID: &str = "topicId";
    pub const TITLE: &str = "title";
    pub const PUBLISHED: &str = "published";
    pub const ORDER: &str = "order";
    pub const TAGS: &str = "tags";
    pub const BUBBLE_IMAGE_URL: &str = "bubbleImageUrl";
    pub const BUBBLE_STORAGE_FILE: &str = "bubbleStorageFile";
    pub const BUBBLE_GRAD_START: &str = "bubbleGradStart";
    pub const BUBBLE_GRAD_END: &str = "bubbleGradEnd";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(skip)]
    pub topic_id: String,
    pub title: Option<String>,
    pub published: bool,
    pub order: i64,
    pub tags: Vec<String>,
    pub bubble_image_url: Option<String>,
    pub bubble_storage_file: Option<String>,
    pub bubble_grad_start: Option<String>,
    pub bubble_grad_end: Option<String>,
}

impl Entity for Topic {
    const KIND: EntityKind = EntityKind::Topic;

    fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            topic_id: document_id(row, cols::ID)?,
            title: optional(row, cols::TITLE),
            published: to_bool(row.get(cols::PUBLISHED), true),
            order: to_int(row.get(cols::ORDER), Some(0)).unwrap_or(0),
            tags: to_string_list(row.get(cols::TAGS)),
            bubble_image_url: optional(row, cols::BUBBLE_IMAGE_URL),
            bubble_storage_file: optional(row, cols::BUBBLE_STORAGE_FILE),
            bubble_grad_start: optional(row, cols::BUBBLE_GRAD_START),
            bubble_grad_end: optional(row, cols::BUBBLE_GRAD_END),
        })
    }

    fn identity(&self) -> &str {
        &self.topic_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topic_document() {
        let row = Row::new(2)
            .with("topicId", "grammar")
            .with("title", " Grammar ")
            .with("order", "3")
            .with("tags", "english; basics")
            .with("bubbleGradStart", "#FFAA00");
        let topic = Topic::from_row(&row).unwrap();
        assert_eq!(topic.identity(), "grammar");

        let doc = serde_json::Value::Object(topic.to_document().unwrap());
        assert_eq!(
            doc,
            json!({
                "title": "Grammar",
                "published": true,
                "order": 3,
                "tags": ["english", "basics"],
                "bubbleImageUrl": null,
                "bubbleStorageFile": null,
                "bubbleGradStart": "#FFAA00",
                "bubbleGradEnd": null,
            })
        );
    }

    #[test]
    fn test_topic_requires_id_only() {
        assert!(Topic::from_row(&Row::new(2).with("title", "No id")).is_err());

        let topic = Topic::from_row(&Row::new(2).with("topicId", "t")).unwrap();
        assert_eq!(topic.title, None);
        assert!(topic.tags.is_empty());
    }
}
