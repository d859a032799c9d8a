// crates/cohort-screen-matchers/src/lexical.rs
// ============================================================================
// Module: Lexical Similarity Backend
// Description: Token-overlap scoring with synonym expansion and negation.
// Purpose: Provide a deterministic, dependency-free similarity baseline.
// Dependencies: cohort-screen-core, serde
// ============================================================================

//! ## Overview
//! The lexical backend scores a (query, passage) pair by query-token
//! coverage: the fraction of content-bearing query tokens that appear
//! positively in the passage. Clinical synonym groups let a query naming a
//! concept match any of its surface forms, and tokens inside a negation
//! window ("no", "denies", "without", "absence of") are excluded so a negated
//! mention never counts as positive evidence. Scores are bounded to `[0, 1]`
//! and deterministic for identical inputs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use cohort_screen_core::SimilarityBackend;
use cohort_screen_core::SimilarityError;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Number of tokens suppressed after a negation cue.
const NEGATION_WINDOW: usize = 3;

/// Function words excluded from query coverage.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "at", "be", "by", "for", "from", "has", "have", "in", "is", "it", "least",
    "may", "must", "of", "on", "or", "per", "the", "to", "with", "within",
];

/// Configuration for the lexical backend.
///
/// # Invariants
/// - Synonym group members are matched as whole-token phrases; keys and
///   members are compared lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalConfig {
    /// Synonym groups keyed by canonical concept token.
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Tokens that open a negation window in passages.
    pub negation_cues: BTreeSet<String>,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        let mut synonyms = BTreeMap::new();
        synonyms.insert(
            "chf".to_string(),
            vec![
                "chf".to_string(),
                "heart failure".to_string(),
                "cardiac dysfunction".to_string(),
            ],
        );
        synonyms.insert(
            "diabetes".to_string(),
            vec![
                "diabetes".to_string(),
                "t2dm".to_string(),
                "type 2 diabetes".to_string(),
                "hyperglycemia".to_string(),
            ],
        );
        synonyms.insert(
            "cancer".to_string(),
            vec!["cancer".to_string(), "malignancy".to_string(), "tumor".to_string()],
        );

        let negation_cues = ["no", "denies", "without", "absence"]
            .iter()
            .map(|cue| (*cue).to_string())
            .collect();

        Self {
            synonyms,
            negation_cues,
        }
    }
}

// ============================================================================
// SECTION: Backend Implementation
// ============================================================================

/// Token-overlap similarity baseline.
#[derive(Debug, Clone, Default)]
pub struct LexicalBackend {
    /// Synonym and negation configuration.
    config: LexicalConfig,
}

impl LexicalBackend {
    /// Creates a lexical backend with the given configuration.
    #[must_use]
    pub const fn new(config: LexicalConfig) -> Self {
        Self {
            config,
        }
    }

    /// Scores query-token coverage against the passage's positive tokens.
    #[must_use]
    fn coverage(&self, query: &str, passage: &str) -> f64 {
        let query_tokens: Vec<String> = tokenize(query)
            .into_iter()
            .filter(|token| !STOPWORDS.contains(&token.as_str()))
            .filter(|token| !self.config.negation_cues.contains(token))
            .collect();
        if query_tokens.is_empty() {
            return 0.0;
        }

        let positive = self.positive_tokens(passage);
        let positive_text = positive.join(" ");
        let positive_set: BTreeSet<&str> = positive.iter().map(String::as_str).collect();

        let matched = query_tokens
            .iter()
            .filter(|token| {
                positive_set.contains(token.as_str())
                    || self.matches_synonym_group(token, &positive_text)
            })
            .count();
        matched as f64 / query_tokens.len() as f64
    }

    /// Returns true when the token's synonym group has a positive mention.
    fn matches_synonym_group(&self, token: &str, positive_text: &str) -> bool {
        let Some(members) = self.config.synonyms.get(token) else {
            return false;
        };
        members.iter().any(|member| contains_phrase(positive_text, member))
    }

    /// Tokenizes the passage and drops tokens inside negation windows.
    fn positive_tokens(&self, passage: &str) -> Vec<String> {
        let tokens = tokenize(passage);
        let mut positive = Vec::with_capacity(tokens.len());
        let mut suppressed = 0_usize;
        for token in tokens {
            if self.config.negation_cues.contains(&token) {
                suppressed = NEGATION_WINDOW;
                continue;
            }
            if suppressed > 0 {
                suppressed -= 1;
                continue;
            }
            positive.push(token);
        }
        positive
    }
}

impl SimilarityBackend for LexicalBackend {
    fn similarity(&self, query: &str, passage: &str) -> Result<f64, SimilarityError> {
        Ok(self.coverage(query, passage))
    }
}

// ============================================================================
// SECTION: Tokenization Helpers
// ============================================================================

/// Splits text into lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true when the phrase occurs as a whole-token sequence.
fn contains_phrase(token_text: &str, phrase: &str) -> bool {
    let normalized = tokenize(phrase).join(" ");
    if normalized.is_empty() {
        return false;
    }
    token_text == normalized
        || token_text.starts_with(&format!("{normalized} "))
        || token_text.ends_with(&format!(" {normalized}"))
        || token_text.contains(&format!(" {normalized} "))
}
