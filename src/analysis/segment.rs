//! Sentence and token segmentation built on UAX-29 boundaries.
//!
//! Segmentation happens once per document. Sentences keep their ordinal
//! source position, which is the key every downstream scoring step uses;
//! nothing here depends on object identity.

use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;

/// Lowercase stop words excluded from frequency tables and span scoring.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

/// Single token within a sentence, normalized to lowercase.
#[derive(Debug, Clone)]
pub struct Token {
    /// Lowercase token text.
    pub text: String,
    /// Whether every character is alphabetic.
    pub is_alphabetic: bool,
    /// Whether the token is a stop word.
    pub is_stopword: bool,
    /// Whether the token is a numeric literal, including dotted references
    /// such as `4.2`.
    pub is_numeric: bool,
}

/// Sentence span with its ordinal position in the source text.
#[derive(Debug, Clone)]
pub struct Sentence {
    /// Zero-based position of the sentence in the document.
    pub index: usize,
    /// Trimmed sentence text as it appears in the source.
    pub text: String,
    /// Tokens in source order.
    pub tokens: Vec<Token>,
}

/// Segmented document: immutable after creation.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable document identifier.
    pub id: String,
    /// Raw text as supplied by the caller.
    pub raw_text: String,
    /// Sentences in source order.
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Segment `text` into sentences and tokens under the given identifier.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let raw_text: String = text.into();
        let sentences = raw_text
            .unicode_sentences()
            .map(|span| span.trim())
            .filter(|span| !span.is_empty())
            .enumerate()
            .map(|(index, span)| Sentence {
                index,
                text: span.to_string(),
                tokens: tokenize(span),
            })
            .collect();

        Self {
            id: id.into(),
            raw_text,
            sentences,
        }
    }

    /// Segment `text` with an identifier derived from its content hash.
    pub fn from_content(text: impl Into<String>) -> Self {
        let raw_text: String = text.into();
        let id = content_hash_id(&raw_text);
        Self::new(id, raw_text)
    }
}

/// Derive a stable document identifier from the SHA-256 hash of its text.
pub fn content_hash_id(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn tokenize(sentence: &str) -> Vec<Token> {
    sentence
        .unicode_words()
        .map(|word| {
            let text = word.to_lowercase();
            let is_alphabetic = text.chars().all(char::is_alphabetic);
            let is_numeric = text.chars().any(|c| c.is_ascii_digit())
                && !text.chars().any(char::is_alphabetic);
            let is_stopword = STOP_WORDS.binary_search(&text.as_str()).is_ok();
            Token {
                text,
                is_alphabetic,
                is_stopword,
                is_numeric,
            }
        })
        .collect()
}
