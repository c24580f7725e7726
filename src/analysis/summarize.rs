//! Extractive summarization by aggregate term frequency.
//!
//! Scores are keyed by sentence ordinal, so selection is deterministic:
//! equal scores fall back to first-seen order, and the selected sentences
//! are re-joined in source order for readability.

use crate::analysis::segment::{Document, Sentence};
use std::collections::HashMap;

/// Mapping from lowercase token to document-scoped occurrence count.
///
/// Only alphabetic, non-stopword, non-numeric tokens contribute, so numeric
/// noise (amounts, section numbers) never dominates the counts.
pub fn term_frequency_table(document: &Document) -> HashMap<String, usize> {
    let mut table = HashMap::new();
    for sentence in &document.sentences {
        for token in &sentence.tokens {
            if token.is_alphabetic && !token.is_stopword && !token.is_numeric {
                *table.entry(token.text.clone()).or_insert(0) += 1;
            }
        }
    }
    table
}

/// Sum of the sentence's token frequencies; numeric tokens contribute zero.
fn score_sentence(sentence: &Sentence, table: &HashMap<String, usize>) -> usize {
    sentence
        .tokens
        .iter()
        .filter(|token| !token.is_numeric)
        .map(|token| table.get(&token.text).copied().unwrap_or(0))
        .sum()
}

/// Select the `count` highest-scoring sentences and join them in source order.
///
/// Documents with fewer than `count` sentences are returned whole; empty or
/// whitespace-only input yields an empty summary.
pub fn summarize(document: &Document, count: usize) -> String {
    if count == 0 || document.sentences.is_empty() {
        return String::new();
    }

    let table = term_frequency_table(document);
    let mut ranked: Vec<(usize, usize)> = document
        .sentences
        .iter()
        .map(|sentence| (sentence.index, score_sentence(sentence, &table)))
        .collect();

    // Highest score first; ties resolve to the earlier sentence.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(count);
    ranked.sort_by_key(|(index, _)| *index);

    ranked
        .into_iter()
        .map(|(index, _)| document.sentences[index].text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
