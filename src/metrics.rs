use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing analysis activity.
#[derive(Default)]
pub struct AnalysisMetrics {
    documents_analyzed: AtomicU64,
    clauses_flagged: AtomicU64,
    risks_flagged: AtomicU64,
    questions_answered: AtomicU64,
}

impl AnalysisMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed analysis pass and the findings it produced.
    pub fn record_analysis(&self, clause_count: u64, risk_count: u64) {
        self.documents_analyzed.fetch_add(1, Ordering::Relaxed);
        self.clauses_flagged.fetch_add(clause_count, Ordering::Relaxed);
        self.risks_flagged.fetch_add(risk_count, Ordering::Relaxed);
    }

    /// Record an answered question, successful or not.
    pub fn record_question(&self) {
        self.questions_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_analyzed: self.documents_analyzed.load(Ordering::Relaxed),
            clauses_flagged: self.clauses_flagged.load(Ordering::Relaxed),
            risks_flagged: self.risks_flagged.load(Ordering::Relaxed),
            questions_answered: self.questions_answered.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of analysis counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents analyzed since startup.
    pub documents_analyzed: u64,
    /// Total key clauses flagged across all documents.
    pub clauses_flagged: u64,
    /// Total risk sentences flagged across all documents.
    pub risks_flagged: u64,
    /// Number of questions routed through the QA engine.
    pub questions_answered: u64,
}
