//! Chunked, strictly sequential commits
//!
//! Operations are split into chunks of at most `batch_size` and each chunk is
//! committed atomically, one after another. A failed chunk is not retried and
//! earlier chunks are not rolled back: the caller sees how far the run got.

use log::{info, warn};

use crate::store::{DocumentStore, MAX_BATCH_WRITES, Operation};

/// Default writes per commit, kept below the store's ceiling
pub const DEFAULT_BATCH_SIZE: usize = 450;

/// Outcome of a fully committed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub operations: usize,
    pub commits: usize,
}

/// A chunk the store refused; everything before it is already applied
#[derive(Debug, thiserror::Error)]
#[error(
    "commit {chunk} of {chunks} failed ({committed_operations} operation(s) already committed)"
)]
pub struct CommitError {
    /// 1-based index of the failed chunk
    pub chunk: usize,
    pub chunks: usize,
    pub committed_operations: usize,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

pub struct BatchCommitter<'a> {
    store: &'a dyn DocumentStore,
    batch_size: usize,
}

impl<'a> BatchCommitter<'a> {
    /// Create a committer; `batch_size` is clamped to `1..=MAX_BATCH_WRITES`
    pub fn new(store: &'a dyn DocumentStore, batch_size: usize) -> Self {
        let clamped = batch_size.clamp(1, MAX_BATCH_WRITES);
        if clamped != batch_size {
            warn!(
                "Batch size {} is outside 1..={}, using {}",
                batch_size, MAX_BATCH_WRITES, clamped
            );
        }

        Self {
            store,
            batch_size: clamped,
        }
    }

    #[cfg(test)]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Commit all operations in order, one chunk at a time
    pub async fn commit_all(&self, operations: &[Operation]) -> Result<CommitSummary, CommitError> {
        let chunks: Vec<&[Operation]> = operations.chunks(self.batch_size).collect();
        let total = chunks.len();
        let mut summary = CommitSummary::default();

        for (idx, chunk) in chunks.into_iter().enumerate() {
            info!("Committing batch {}/{} ({} writes)", idx + 1, total, chunk.len());

            self.store
                .commit(chunk)
                .await
                .map_err(|e| CommitError {
                    chunk: idx + 1,
                    chunks: total,
                    committed_operations: summary.operations,
                    source: e.into(),
                })?;

            summary.commits += 1;
            summary.operations += chunk.len();
        }

        Ok(summary)
    }
}
