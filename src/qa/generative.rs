//! Retrieval-augmented QA through the completion endpoint.

use crate::analysis::segment::Document;
use crate::embedding::EmbeddingClient;
use crate::qa::completion::CompletionClient;
use crate::qa::{QaBackend, QaError};
use crate::store::VectorStoreService;
use async_trait::async_trait;
use std::sync::Arc;

/// Backend that grounds completions in passages retrieved from the store.
pub struct GenerativeBackend {
    embedder: Arc<dyn EmbeddingClient + Send + Sync>,
    store: Arc<VectorStoreService>,
    completion: CompletionClient,
    collection: String,
    retrieval_limit: usize,
}

impl GenerativeBackend {
    /// Construct a backend over the given collaborators.
    pub fn new(
        embedder: Arc<dyn EmbeddingClient + Send + Sync>,
        store: Arc<VectorStoreService>,
        completion: CompletionClient,
        collection: impl Into<String>,
        retrieval_limit: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            completion,
            collection: collection.into(),
            retrieval_limit: retrieval_limit.max(1),
        }
    }

    async fn grounding_context(
        &self,
        question: &str,
        document: &Document,
    ) -> Result<String, QaError> {
        let vector = self.embedder.encode(question).await?;
        let records = self
            .store
            .search(&self.collection, vector, self.retrieval_limit)
            .await?;

        let passages: Vec<String> = records
            .into_iter()
            .filter_map(|record| record.text)
            .filter(|text| !text.trim().is_empty())
            .collect();

        if passages.is_empty() {
            // Nothing retrievable yet; ground in the loaded document itself.
            tracing::debug!("No stored passages retrieved; grounding in loaded document");
            return Ok(document.raw_text.clone());
        }

        Ok(passages.join("\n\n"))
    }
}

fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer the question using only the context below. \
         If the context does not contain the answer, say so.\n\n\
         Context:\n{context}\n\nQuestion: {question}"
    )
}

#[async_trait]
impl QaBackend for GenerativeBackend {
    async fn answer(&self, question: &str, document: &Document) -> Result<String, QaError> {
        let context = self.grounding_context(question, document).await?;
        let prompt = build_prompt(question, &context);
        let answer = self.completion.complete(&prompt).await?;
        Ok(answer)
    }
}
