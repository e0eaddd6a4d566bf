//! In-process document store with merge semantics
//!
//! Backs `--dry-run` and the tests. Each commit is applied as a whole while the
//! lock is held, mirroring the all-or-nothing behaviour of a real batch.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{DocumentStore, Operation};

type DocumentKey = (String, String);

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<DocumentKey, Map<String, Value>>,
    commit_sizes: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits applied so far
    pub fn commit_count(&self) -> usize {
        self.lock().commit_sizes.len()
    }

    /// Operation count of every commit, in order
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.lock().commit_sizes.clone()
    }

    /// Number of distinct stored documents
    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Current content of a stored document
    #[cfg(test)]
    pub fn get(&self, collection: &str, document_id: &str) -> Option<Map<String, Value>> {
        self.lock()
            .documents
            .get(&(collection.to_string(), document_id.to_string()))
            .cloned()
    }

    /// Store a document directly, bypassing commit accounting
    #[cfg(test)]
    pub fn seed(&self, collection: &str, document_id: &str, data: Value) {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.lock()
            .documents
            .insert((collection.to_string(), document_id.to_string()), data);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn commit(&self, batch: &[Operation]) -> Result<()> {
        let mut state = self.lock();

        for op in batch {
            let key = (op.collection.clone(), op.document_id.clone());
            let document = state.documents.entry(key).or_default();
            for (field, value) in &op.data {
                document.insert(field.clone(), value.clone());
            }
            debug!("memory store: merged {} field(s) into {}", op.data.len(), op.path());
        }

        state.commit_sizes.push(batch.len());
        Ok(())
    }
}
