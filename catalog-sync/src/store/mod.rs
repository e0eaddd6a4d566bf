//! Document store seam
//!
//! The uploader only ever talks to a [`DocumentStore`]; the concrete backend is
//! chosen once at startup and passed in.

mod credentials;
mod firestore;
mod memory;
mod operation;

pub use credentials::Credentials;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use operation::Operation;

use anyhow::Result;
use async_trait::async_trait;

/// Hard ceiling on writes per atomic commit imposed by the store
pub const MAX_BATCH_WRITES: usize = 500;

/// A document store that applies batches of upserts atomically
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Apply every operation in `batch`, or none of them
    async fn commit(&self, batch: &[Operation]) -> Result<()>;
}
