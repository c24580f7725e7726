#![deny(missing_docs)]

//! Core library for the Legalens document analysis service.

/// Document segmentation, classification, summarization, and orchestration.
pub mod analysis;
/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// Structured logging and tracing setup.
pub mod logging;
/// Analysis activity counters.
pub mod metrics;
/// Question-answering backends.
pub mod qa;
/// Regulatory-update feed client and correlator.
pub mod regulatory;
/// Vector store integration for document embeddings.
pub mod store;
