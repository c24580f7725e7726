//! Sentence-level pattern classification against phrase lexicons.

use crate::analysis::lexicon::{Lexicon, LexiconCategory, builtin};
use crate::analysis::segment::Document;
use std::collections::HashSet;

/// Collect the sentences matching the built-in lexicon for `category`.
///
/// Output preserves first-occurrence order and drops exact-duplicate
/// sentence text. Pure function: no side effects, deterministic.
pub fn classify(document: &Document, category: LexiconCategory) -> Vec<String> {
    classify_with(document, builtin(category))
}

/// Collect the sentences matching an arbitrary lexicon.
pub fn classify_with(document: &Document, lexicon: &Lexicon) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for sentence in &document.sentences {
        if !lexicon.matches(&sentence.text.to_lowercase()) {
            continue;
        }
        if seen.insert(sentence.text.clone()) {
            matched.push(sentence.text.clone());
        }
    }

    matched
}
