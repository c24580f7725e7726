//! Core data types and error definitions for the analysis pipeline.

use crate::embedding::EmbeddingClientError;
use crate::regulatory::AffectedSection;
use crate::store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors emitted while persisting a document embedding.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Embedding backend failed to produce a vector for the document.
    #[error("Failed to generate embedding: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Vector store interaction failed.
    #[error("Vector store request failed: {0}")]
    Store(#[from] StoreError),
}

/// Structured outcome of one analysis pass, consumed by export collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Extractive summary of the document.
    pub summary: String,
    /// Sentences carrying obligation or duty language, in source order.
    pub key_clauses: Vec<String>,
    /// Sentences carrying conditional or limiting language, in source order.
    pub risks: Vec<String>,
    /// Regulatory updates whose labels both appear in the document.
    pub affected_sections: Vec<AffectedSection>,
}

/// Outcome of a question-answering call.
///
/// A failed backend yields an empty answer plus a diagnostic rather than an
/// error; QA failures must never abort the surrounding session.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    /// Answer text; empty when the backend reported a failure.
    pub answer: String,
    /// Diagnostic describing the failure, when one occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl AnswerReport {
    /// Report a successful answer.
    pub fn answered(answer: String) -> Self {
        Self {
            answer,
            failure: None,
        }
    }

    /// Report a failed attempt with an empty answer.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            answer: String::new(),
            failure: Some(reason.into()),
        }
    }
}
