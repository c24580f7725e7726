//! Span-selection QA over the loaded document.

use crate::analysis::segment::Document;
use crate::qa::{QaBackend, QaError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Backend that returns the best-supported contiguous sentence span verbatim.
///
/// Support is measured as overlap between the question's content tokens and
/// the span's tokens. Ties prefer the shorter span, then the earlier one.
pub struct ExtractiveBackend {
    max_span_sentences: usize,
}

impl ExtractiveBackend {
    /// Construct a backend considering spans of up to `max_span_sentences`.
    pub fn new(max_span_sentences: usize) -> Self {
        Self {
            max_span_sentences: max_span_sentences.max(1),
        }
    }

    fn best_span(&self, question: &str, document: &Document) -> Option<String> {
        let question_terms = content_terms(question);
        if question_terms.is_empty() || document.sentences.is_empty() {
            return None;
        }

        let sentence_terms: Vec<HashSet<&str>> = document
            .sentences
            .iter()
            .map(|sentence| {
                sentence
                    .tokens
                    .iter()
                    .filter(|token| !token.is_stopword && !token.is_numeric)
                    .map(|token| token.text.as_str())
                    .collect()
            })
            .collect();

        let mut best: Option<(usize, usize, usize)> = None; // (score, width, start)
        for start in 0..document.sentences.len() {
            let max_width = self
                .max_span_sentences
                .min(document.sentences.len() - start);
            for width in 1..=max_width {
                let mut covered: HashSet<&str> = HashSet::new();
                for terms in &sentence_terms[start..start + width] {
                    covered.extend(terms.iter().copied());
                }
                let score = question_terms
                    .iter()
                    .filter(|term| covered.contains(term.as_str()))
                    .count();
                if score == 0 {
                    continue;
                }
                let candidate = (score, width, start);
                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        // Higher score wins; then narrower span; then earlier start.
                        let better = candidate.0 > current.0
                            || (candidate.0 == current.0 && candidate.1 < current.1)
                            || (candidate.0 == current.0
                                && candidate.1 == current.1
                                && candidate.2 < current.2);
                        Some(if better { candidate } else { current })
                    }
                };
            }
        }

        best.map(|(_, width, start)| {
            document.sentences[start..start + width]
                .iter()
                .map(|sentence| sentence.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

fn content_terms(question: &str) -> Vec<String> {
    let parsed = Document::new("question", question);
    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for sentence in &parsed.sentences {
        for token in &sentence.tokens {
            if token.is_stopword || token.is_numeric {
                continue;
            }
            if seen.insert(token.text.clone()) {
                terms.push(token.text.clone());
            }
        }
    }
    terms
}

#[async_trait]
impl QaBackend for ExtractiveBackend {
    async fn answer(&self, question: &str, document: &Document) -> Result<String, QaError> {
        Ok(self.best_span(question, document).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document::new(
            "d1",
            "This agreement commences on the effective date. \
             The vendor shall deliver the goods within thirty days. \
             Payment is subject to approval by the finance team. \
             Either party may terminate with sixty days notice.",
        )
    }

    #[tokio::test]
    async fn selects_the_supporting_sentence() {
        let backend = ExtractiveBackend::new(1);
        let answer = backend
            .answer("When must the vendor deliver the goods?", &sample_document())
            .await
            .expect("answer");
        assert_eq!(
            answer,
            "The vendor shall deliver the goods within thirty days."
        );
    }

    #[tokio::test]
    async fn unsupported_question_yields_empty_answer() {
        let backend = ExtractiveBackend::new(2);
        let answer = backend
            .answer("What colour is the packaging?", &sample_document())
            .await
            .expect("answer");
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn wider_span_wins_when_it_covers_more_terms() {
        let backend = ExtractiveBackend::new(2);
        let doc = Document::new(
            "d1",
            "Termination requires notice. The notice period is sixty days. Unrelated filler.",
        );
        let answer = backend
            .answer("What is the termination notice period?", &doc)
            .await
            .expect("answer");
        assert_eq!(
            answer,
            "Termination requires notice. The notice period is sixty days."
        );
    }

    #[tokio::test]
    async fn empty_document_yields_empty_answer() {
        let backend = ExtractiveBackend::new(2);
        let doc = Document::new("d1", "");
        let answer = backend.answer("Anything?", &doc).await.expect("answer");
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn answers_are_deterministic() {
        let backend = ExtractiveBackend::new(2);
        let doc = sample_document();
        let question = "Who approves payment?";
        let first = backend.answer(question, &doc).await.expect("answer");
        let second = backend.answer(question, &doc).await.expect("answer");
        assert_eq!(first, second);
    }
}
