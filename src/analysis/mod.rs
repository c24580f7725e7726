//! Document analysis pipeline: segmentation, classification, summarization,
//! and session orchestration.

pub mod classify;
pub mod lexicon;
pub mod segment;
mod service;
pub mod summarize;
pub mod types;

pub use service::{AnalysisApi, AnalyzerService};
pub use types::{AnalysisError, AnalysisResult, AnswerReport};
