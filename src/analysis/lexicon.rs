//! Phrase lexicons used by the pattern classifier.
//!
//! Lexicons are data: the built-in phrase lists below can be extended or
//! replaced without touching the matching algorithm in
//! [`crate::analysis::classify`].

use std::sync::OnceLock;

/// Category identifying which built-in lexicon to match against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexiconCategory {
    /// Obligation and duty language ("shall", "must", "indemnify", ...).
    ClauseIndicator,
    /// Conditional and limiting language ("subject to", "unless", ...).
    RiskIndicator,
}

/// Fixed set of lowercase phrases for one category.
#[derive(Debug, Clone)]
pub struct Lexicon {
    phrases: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon from arbitrary phrases, normalized to lowercase.
    ///
    /// Empty phrases are dropped so that no sentence matches vacuously.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|phrase| phrase.as_ref().trim().to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        Self { phrases }
    }

    /// Whether any lexicon phrase appears as a substring of the lowercased
    /// sentence. Deliberately permissive: no token-boundary check, trading
    /// precision for recall.
    pub fn matches(&self, sentence_lower: &str) -> bool {
        self.phrases
            .iter()
            .any(|phrase| sentence_lower.contains(phrase.as_str()))
    }

    /// Phrases held by this lexicon.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

const CLAUSE_INDICATORS: &[&str] = &[
    "shall",
    "must",
    "obliged to",
    "required to",
    "responsible for",
    "liable for",
    "warrant",
    "guarantee",
    "indemnify",
    "breach of",
];

const RISK_INDICATORS: &[&str] = &[
    "subject to",
    "provided that",
    "unless",
    "in the event of",
    "without prejudice",
    "under no circumstances",
    "notwithstanding",
    "in the case of",
    "except as otherwise",
    "limited to",
    "shall not",
    "at the discretion of",
    "force majeure",
    "to the extent permitted by law",
    "contingency",
    "dependency",
];

/// Built-in lexicon for the given category, loaded once per process.
pub fn builtin(category: LexiconCategory) -> &'static Lexicon {
    static CLAUSES: OnceLock<Lexicon> = OnceLock::new();
    static RISKS: OnceLock<Lexicon> = OnceLock::new();

    match category {
        LexiconCategory::ClauseIndicator => {
            CLAUSES.get_or_init(|| Lexicon::new(CLAUSE_INDICATORS))
        }
        LexiconCategory::RiskIndicator => RISKS.get_or_init(|| Lexicon::new(RISK_INDICATORS)),
    }
}
