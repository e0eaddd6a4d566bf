//! Write operations submitted to the document store

use serde::Serialize;
use serde_json::{Map, Value};

/// A single upsert-with-merge of one document
///
/// Fields present in `data` overwrite the stored fields of the same name;
/// stored fields absent from `data` are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Collection name (e.g. "products")
    pub collection: String,
    /// Document id within the collection
    pub document_id: String,
    /// Fields to merge into the document
    pub data: Map<String, Value>,
}

impl Operation {
    /// Create a new upsert operation
    pub fn upsert(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
            data,
        }
    }

    /// `collection/document_id`
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.document_id)
    }

    /// Names of the fields this operation writes
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}
