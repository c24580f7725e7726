//! HTTP surface for Legalens.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /analyze` – Run the full analysis pass over raw document text and
//!   return `{ summary, key_clauses, risks, affected_sections }`.
//! - `POST /documents` – Embed and persist a document for later retrieval
//!   (idempotent per document identifier).
//! - `POST /ask` – Answer a question about the most recently loaded document.
//! - `GET /metrics` – Observe analysis counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery.
//!
//! Text extraction from uploaded files stays with external collaborators;
//! every endpoint accepts raw text.

use crate::analysis::{AnalysisApi, AnalysisError, AnalysisResult, AnswerReport};
use crate::metrics::MetricsSnapshot;
use crate::store::UpsertOutcome;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the analysis API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: AnalysisApi + 'static,
{
    Router::new()
        .route("/analyze", post(analyze_document::<S>))
        .route("/documents", post(store_document::<S>))
        .route("/ask", post(ask_question::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /analyze` endpoint.
#[derive(Deserialize)]
struct AnalyzeRequest {
    /// Raw document text to analyze.
    text: String,
    /// Optional stable identifier (defaults to the content hash).
    #[serde(default)]
    document_id: Option<String>,
}

/// Run one analysis pass and return the structured result.
async fn analyze_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalysisResult>
where
    S: AnalysisApi,
{
    let result = service.analyze(request.document_id, request.text).await;
    Json(result)
}

/// Request body for the `POST /documents` endpoint.
#[derive(Deserialize)]
struct StoreRequest {
    /// Stable document identifier.
    document_id: String,
    /// Raw document text to embed and persist.
    text: String,
}

/// Success response for the `POST /documents` endpoint.
#[derive(Serialize)]
struct StoreResponse {
    /// Whether a new record was written (`false` when skipped).
    stored: bool,
}

/// Embed and persist a document, skipping when a record already exists.
async fn store_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<StoreRequest>,
) -> Result<Json<StoreResponse>, AppError>
where
    S: AnalysisApi,
{
    let outcome = service
        .store_document(&request.document_id, &request.text)
        .await?;
    Ok(Json(StoreResponse {
        stored: outcome == UpsertOutcome::Inserted,
    }))
}

/// Request body for the `POST /ask` endpoint.
#[derive(Deserialize)]
struct AskRequest {
    /// Question about the most recently loaded document.
    question: String,
}

/// Answer a question about the loaded document.
///
/// Backend failures yield an empty answer plus a `failure` diagnostic with
/// status 200; QA failures never abort the session.
async fn ask_question<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AskRequest>,
) -> Json<AnswerReport>
where
    S: AnalysisApi,
{
    let report = service.answer_question(&request.question).await;
    Json(report)
}

/// Return a concise metrics snapshot with analysis counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: AnalysisApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "analyze",
                method: "POST",
                path: "/analyze",
                description: "Analyze raw document text. Response returns { \"summary\", \"key_clauses\", \"risks\", \"affected_sections\" }.",
                request_example: Some(json!({
                    "text": "The vendor shall deliver the goods.",
                    "document_id": "contract-2024.pdf"
                })),
            },
            CommandDescriptor {
                name: "store_document",
                method: "POST",
                path: "/documents",
                description: "Embed and persist a document for retrieval. A second call for the same document_id is a no-op.",
                request_example: Some(json!({
                    "document_id": "contract-2024.pdf",
                    "text": "Full document text"
                })),
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Answer a question about the most recently loaded document.",
                request_example: Some(json!({
                    "question": "When must the vendor deliver the goods?"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return analysis counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(AnalysisError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(inner: AnalysisError) -> Self {
        Self(inner)
    }
}
