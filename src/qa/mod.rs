//! Question-answering backends for loaded documents.
//!
//! One trait, two strategies: [`extractive::ExtractiveBackend`] selects a
//! contiguous answer span directly from the document, while
//! [`generative::GenerativeBackend`] retrieves stored passages and forwards
//! a grounded prompt to a chat-completions endpoint. Failures carry a tagged
//! reason and never crash the surrounding session; the service converts them
//! to an empty answer plus a diagnostic.

pub mod completion;
pub mod extractive;
pub mod generative;

use crate::analysis::segment::Document;
use crate::embedding::EmbeddingClientError;
use crate::store::StoreError;
use async_trait::async_trait;
use thiserror::Error;

pub use completion::{CompletionClient, CompletionError};
pub use extractive::ExtractiveBackend;
pub use generative::GenerativeBackend;

/// Errors raised while answering a question.
#[derive(Debug, Error)]
pub enum QaError {
    /// Embedding the question failed.
    #[error("Failed to embed question: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Passage retrieval from the vector store failed.
    #[error("Passage retrieval failed: {0}")]
    Store(#[from] StoreError),
    /// The completion endpoint reported a failure.
    #[error("Completion request failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Interface implemented by question-answering strategies.
///
/// Every call is a fresh query; no answer is cached.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Answer `question` grounded in the loaded `document`.
    async fn answer(&self, question: &str, document: &Document) -> Result<String, QaError>;
}
