//! Vector store integration for document embeddings.

pub mod client;
pub mod payload;
pub mod types;

pub use client::VectorStoreService;
pub use payload::record_id_for;
pub use types::{ScoredRecord, StoreError, UpsertOutcome};
