//! Sheet to collection bindings

use std::fmt;

/// Collection holding the aggregate segment document
pub const SEGMENTS_COLLECTION: &str = "ui";
/// Document id of the aggregate segment document
pub const SEGMENTS_DOCUMENT: &str = "segments_v1";
/// Field of the aggregate document holding the ordered segment list
pub const SEGMENTS_FIELD: &str = "segments";

/// The entity types carried by a catalog workbook, in upload order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Segment,
    Topic,
    Product,
    FeaturedList,
    ContentItem,
}

impl EntityKind {
    /// All bindings in the order they are uploaded
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Segment,
        EntityKind::Topic,
        EntityKind::Product,
        EntityKind::FeaturedList,
        EntityKind::ContentItem,
    ];

    /// Default sheet name
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Segment => "Segments",
            Self::Topic => "Topics",
            Self::Product => "Products",
            Self::FeaturedList => "FeaturedLists",
            Self::ContentItem => "ContentItems",
        }
    }

    /// Legacy sheet names still accepted
    pub fn sheet_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Segment => &["UI_SEGMENTS"],
            Self::Topic => &["TOPICS"],
            Self::Product => &["PRODUCTS"],
            Self::FeaturedList => &["FEATURED_LISTS"],
            Self::ContentItem => &["CONTENT_ITEMS"],
        }
    }

    /// Target collection in the document store
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Segment => SEGMENTS_COLLECTION,
            Self::Topic => "topics",
            Self::Product => "products",
            Self::FeaturedList => "featured_lists",
            Self::ContentItem => "content_items",
        }
    }

    /// Key used for this binding in the config file (`[sheets.<key>]`)
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Segment => "segments",
            Self::Topic => "topics",
            Self::Product => "products",
            Self::FeaturedList => "featured_lists",
            Self::ContentItem => "content_items",
        }
    }

    /// Whether the whole sheet becomes one aggregate document
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Segment)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Segment => "segments",
            Self::Topic => "topics",
            Self::Product => "products",
            Self::FeaturedList => "featured lists",
            Self::ContentItem => "content items",
        };
        write!(f, "{}", label)
    }
}
