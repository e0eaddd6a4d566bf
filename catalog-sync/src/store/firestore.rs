//! Firestore REST backend
//!
//! One batch becomes one `documents:commit` request, which Firestore applies
//! atomically. Every write carries an `updateMask` naming exactly the fields
//! being written, so stored fields outside the mask survive (merge semantics).

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{Map, Value, json};

use super::credentials::Credentials;
use super::{DocumentStore, Operation};

pub struct FirestoreStore {
    client: Client,
    base_url: String,
    /// `projects/{project}/databases/(default)`
    database: String,
    token: String,
}

impl FirestoreStore {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("catalog-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            "Using Firestore project '{}' at {}",
            credentials.project_id,
            credentials.base_url()
        );
        if let Some(email) = &credentials.client_email {
            debug!("Service account: {}", email);
        }

        Ok(Self {
            client,
            base_url: credentials.base_url(),
            database: format!("projects/{}/databases/(default)", credentials.project_id),
            token: credentials.bearer_token().to_string(),
        })
    }

    fn document_name(&self, op: &Operation) -> String {
        format!("{}/documents/{}", self.database, op.path())
    }

    /// Build the `documents:commit` request body for a batch
    fn commit_body(&self, batch: &[Operation]) -> Value {
        let writes: Vec<Value> = batch
            .iter()
            .map(|op| {
                json!({
                    "update": {
                        "name": self.document_name(op),
                        "fields": encode_fields(&op.data),
                    },
                    "updateMask": {
                        "fieldPaths": op.field_names().map(field_path).collect::<Vec<_>>(),
                    },
                })
            })
            .collect();

        json!({ "writes": writes })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn commit(&self, batch: &[Operation]) -> Result<()> {
        let url = format!("{}/{}/documents:commit", self.base_url, self.database);
        let body = self.commit_body(batch);

        debug!("POST {} ({} writes)", url, batch.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("Failed to send commit request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Firestore rejected commit (HTTP {}): {}", status, text.trim());
        }

        Ok(())
    }
}

/// Encode a JSON object as Firestore document fields
fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

/// Encode a JSON value as a Firestore typed value
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // int64 values travel as decimal strings
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            if items.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                let values: Vec<Value> = items.iter().map(encode_value).collect();
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Field path for an update mask; non-identifier names are backtick-quoted
fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
