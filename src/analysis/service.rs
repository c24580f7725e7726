//! Analysis service coordinating classification, summarization, embedding
//! storage, regulatory correlation, and question answering.

use crate::{
    analysis::{
        classify::classify,
        lexicon::LexiconCategory,
        segment::Document,
        summarize::summarize,
        types::{AnalysisError, AnalysisResult, AnswerReport},
    },
    config::{QaBackendKind, get_config},
    embedding::{EmbeddingClient, default_client},
    metrics::{AnalysisMetrics, MetricsSnapshot},
    qa::{CompletionClient, ExtractiveBackend, GenerativeBackend, QaBackend},
    regulatory::{RegulatoryFeedClient, correlate},
    store::{UpsertOutcome, VectorStoreService},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Sentence spans considered by the extractive QA backend.
const EXTRACTIVE_SPAN_SENTENCES: usize = 2;

/// Coordinates one synchronous analysis pass per document and holds the
/// session's current document for question answering.
///
/// The service owns long-lived handles to the embedding client, vector
/// store, QA backend, regulatory feed, and metrics so that every surface
/// reuses the same components. Construct it once near process start and
/// share it through an `Arc`.
pub struct AnalyzerService {
    embedder: Arc<dyn EmbeddingClient + Send + Sync>,
    store: Arc<VectorStoreService>,
    qa: Box<dyn QaBackend>,
    feed: RegulatoryFeedClient,
    metrics: Arc<AnalysisMetrics>,
    collection: String,
    summary_sentence_count: usize,
    current_document: RwLock<Option<Document>>,
}

/// Abstraction over the analysis pipeline used by external surfaces.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Run one full analysis pass over raw document text.
    async fn analyze(&self, document_id: Option<String>, text: String) -> AnalysisResult;

    /// Embed and persist a document, skipping when a record already exists.
    async fn store_document(
        &self,
        document_id: &str,
        text: &str,
    ) -> Result<UpsertOutcome, AnalysisError>;

    /// Answer a question about the most recently loaded document.
    async fn answer_question(&self, question: &str) -> AnswerReport;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl AnalyzerService {
    /// Build a service from explicit collaborators.
    pub fn new(
        embedder: Arc<dyn EmbeddingClient + Send + Sync>,
        store: Arc<VectorStoreService>,
        qa: Box<dyn QaBackend>,
        feed: RegulatoryFeedClient,
        collection: impl Into<String>,
        summary_sentence_count: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            qa,
            feed,
            metrics: Arc::new(AnalysisMetrics::new()),
            collection: collection.into(),
            summary_sentence_count: summary_sentence_count.max(1),
            current_document: RwLock::new(None),
        }
    }

    /// Build a service wired from the process configuration, ensuring the
    /// embedding collection exists before serving requests.
    pub async fn from_config() -> Self {
        let config = get_config();
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let embedder = default_client(config.embedding_dimension);
        let store = Arc::new(
            VectorStoreService::new(&config.store_url, config.store_api_key.clone(), timeout)
                .expect("Failed to build vector store client"),
        );
        store
            .ensure_collection(
                &config.store_collection_name,
                config.embedding_dimension as u64,
            )
            .await
            .expect("Failed to ensure embedding collection exists");
        tracing::debug!(collection = %config.store_collection_name, "Embedding collection ready");

        let qa: Box<dyn QaBackend> = match config.qa_backend {
            QaBackendKind::Extractive => {
                Box::new(ExtractiveBackend::new(EXTRACTIVE_SPAN_SENTENCES))
            }
            QaBackendKind::Generative => {
                let completion = CompletionClient::new(
                    config.completion_url.clone(),
                    config.completion_model.clone(),
                    config.completion_api_key.clone(),
                    timeout,
                )
                .expect("Failed to build completion client");
                Box::new(GenerativeBackend::new(
                    embedder.clone(),
                    store.clone(),
                    completion,
                    config.store_collection_name.clone(),
                    config.retrieval_limit,
                ))
            }
        };

        let feed = RegulatoryFeedClient::new(config.regulatory_feed_url.clone(), timeout)
            .expect("Failed to build regulatory feed client");

        Self::new(
            embedder,
            store,
            qa,
            feed,
            config.store_collection_name.clone(),
            config.summary_sentence_count,
        )
    }

    async fn fetch_affected_sections(
        &self,
        document_text: &str,
    ) -> Vec<crate::regulatory::AffectedSection> {
        match self.feed.fetch_updates().await {
            Ok(updates) => correlate(document_text, &updates),
            Err(error) => {
                tracing::warn!(error = %error, "Regulatory feed unavailable; skipping correlation");
                Vec::new()
            }
        }
    }

    async fn persist_embedding(&self, document: &Document) {
        let result = self
            .store_embedding(&document.id, &document.raw_text)
            .await;
        if let Err(error) = result {
            tracing::warn!(
                document_id = %document.id,
                error = %error,
                "Failed to persist document embedding"
            );
        }
    }

    async fn store_embedding(
        &self,
        document_id: &str,
        text: &str,
    ) -> Result<UpsertOutcome, AnalysisError> {
        let vector = self.embedder.encode(text).await?;
        let outcome = self
            .store
            .upsert_record(&self.collection, document_id, text, vector)
            .await?;
        Ok(outcome)
    }
}

#[async_trait]
impl AnalysisApi for AnalyzerService {
    async fn analyze(&self, document_id: Option<String>, text: String) -> AnalysisResult {
        let document = match document_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Document::new(id, text),
            None => Document::from_content(text),
        };
        tracing::info!(
            document_id = %document.id,
            sentences = document.sentences.len(),
            "Analyzing document"
        );

        let key_clauses = classify(&document, LexiconCategory::ClauseIndicator);
        let risks = classify(&document, LexiconCategory::RiskIndicator);
        let summary = summarize(&document, self.summary_sentence_count);
        let affected_sections = self.fetch_affected_sections(&document.raw_text).await;

        self.persist_embedding(&document).await;
        self.metrics
            .record_analysis(key_clauses.len() as u64, risks.len() as u64);
        tracing::info!(
            document_id = %document.id,
            clauses = key_clauses.len(),
            risks = risks.len(),
            affected = affected_sections.len(),
            "Analysis complete"
        );

        *self.current_document.write().await = Some(document);

        AnalysisResult {
            summary,
            key_clauses,
            risks,
            affected_sections,
        }
    }

    async fn store_document(
        &self,
        document_id: &str,
        text: &str,
    ) -> Result<UpsertOutcome, AnalysisError> {
        let outcome = self.store_embedding(document_id, text).await?;
        tracing::info!(document_id, outcome = ?outcome, "Document stored");
        *self.current_document.write().await = Some(Document::new(document_id, text));
        Ok(outcome)
    }

    async fn answer_question(&self, question: &str) -> AnswerReport {
        self.metrics.record_question();

        let guard = self.current_document.read().await;
        let Some(document) = guard.as_ref() else {
            return AnswerReport::failed("no document loaded");
        };

        match self.qa.answer(question, document).await {
            Ok(answer) => AnswerReport::answered(answer),
            Err(error) => {
                tracing::warn!(error = %error, "Question answering failed");
                AnswerReport::failed(error.to_string())
            }
        }
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedEncoder;
    use httpmock::{
        Method::{GET, POST, PUT},
        MockServer,
    };
    use serde_json::json;

    fn service_for(server: &MockServer) -> AnalyzerService {
        let timeout = Duration::from_secs(5);
        let store = Arc::new(
            VectorStoreService::new(&server.base_url(), None, timeout).expect("store"),
        );
        let feed = RegulatoryFeedClient::new(
            format!("{}/regulatory", server.base_url()),
            timeout,
        )
        .expect("feed");
        AnalyzerService::new(
            Arc::new(HashedEncoder::new(8)),
            store,
            Box::new(ExtractiveBackend::new(2)),
            feed,
            "legal",
            2,
        )
    }

    async fn mock_store_writes(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/collections/legal/points/");
                then.status(404).body("not found");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/collections/legal/points");
                then.status(200).json_body(json!({ "result": {} }));
            })
            .await;
    }

    #[tokio::test]
    async fn analyze_produces_clauses_risks_and_summary() {
        let server = MockServer::start_async().await;
        mock_store_writes(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/regulatory");
                then.status(200).json_body(json!({
                    "regulatory_updates": [
                        { "section": "4", "sub_section": "2", "update": "revised thresholds" },
                        { "section": "9", "sub_section": "9", "update": "unrelated" }
                    ]
                }));
            })
            .await;

        let service = service_for(&server);
        let result = service
            .analyze(
                Some("contract.pdf".into()),
                "The vendor shall deliver the goods under section 4 sub-section 2. \
                 Payment is subject to approval. The total cost was 1200 dollars."
                    .into(),
            )
            .await;

        assert_eq!(
            result.key_clauses,
            vec!["The vendor shall deliver the goods under section 4 sub-section 2.".to_string()]
        );
        assert_eq!(
            result.risks,
            vec!["Payment is subject to approval.".to_string()]
        );
        assert_eq!(result.affected_sections.len(), 1);
        assert_eq!(result.affected_sections[0].update, "revised thresholds");
        assert!(!result.summary.contains("1200"));

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.documents_analyzed, 1);
        assert_eq!(snapshot.clauses_flagged, 1);
        assert_eq!(snapshot.risks_flagged, 1);
    }

    #[tokio::test]
    async fn feed_failure_neutralizes_correlation_only() {
        let server = MockServer::start_async().await;
        mock_store_writes(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/regulatory");
                then.status(500).body("boom");
            })
            .await;

        let service = service_for(&server);
        let result = service
            .analyze(None, "The licensee shall not assign this agreement.".into())
            .await;

        assert!(result.affected_sections.is_empty());
        assert_eq!(result.risks.len(), 1);
    }

    #[tokio::test]
    async fn question_without_document_reports_failure() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let report = service.answer_question("What is the term?").await;
        assert_eq!(report.answer, "");
        assert!(report.failure.is_some());
        assert_eq!(service.metrics_snapshot().questions_answered, 1);
    }

    #[tokio::test]
    async fn question_after_analysis_uses_loaded_document() {
        let server = MockServer::start_async().await;
        mock_store_writes(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/regulatory");
                then.status(200).json_body(json!({ "regulatory_updates": [] }));
            })
            .await;

        let service = service_for(&server);
        service
            .analyze(
                Some("d1".into()),
                "The vendor shall deliver the goods within thirty days.".into(),
            )
            .await;

        let report = service
            .answer_question("When must the vendor deliver the goods?")
            .await;
        assert_eq!(
            report.answer,
            "The vendor shall deliver the goods within thirty days."
        );
        assert!(report.failure.is_none());
    }
}
