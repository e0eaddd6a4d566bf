//! Catalog upload: rows to typed entities to batched store writes

mod batch;
pub mod entities;
pub mod order;
mod orchestrator;
mod schema;
pub mod values;

pub use batch::DEFAULT_BATCH_SIZE;
pub use orchestrator::{
    SheetStatus, SheetSummary, UploadError, UploadSummary, Uploader, sheet_candidates,
};
pub use schema::EntityKind;
