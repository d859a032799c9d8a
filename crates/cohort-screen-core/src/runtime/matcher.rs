// crates/cohort-screen-core/src/runtime/matcher.rs
// ============================================================================
// Module: Cohort Screen Semantic Matcher
// Description: Semantic matching of requirement text against note passages.
// Purpose: Convert similarity scores into tri-state criterion results.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The semantic matcher evaluates one unstructured criterion against a
//! patient's clinical note. The note is segmented into candidate passages at
//! sentence and line granularity, each passage is scored against the
//! requirement text through the injected similarity backend, and the maximum
//! score is banded against two thresholds. Unstructured criteria never
//! resolve to FAIL: absence or weakness of textual evidence is ambiguous,
//! not disqualifying, and a backend failure or timeout likewise degrades the
//! criterion to MAYBE instead of aborting the evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CriterionResult;
use crate::core::PatientProfile;
use crate::interfaces::SimilarityBackend;

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Similarity thresholds banding match scores into PASS and MAYBE.
///
/// # Invariants
/// - `t_maybe < t_pass`; both lie in `[0, 1]`. Enforced by configuration
///   validation before a matcher is constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Minimum score for a PASS ("semantic match").
    pub t_pass: f64,
    /// Minimum score for a "weak semantic match" MAYBE reason; scores below
    /// it are still MAYBE, reported as "no semantic match".
    pub t_maybe: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            t_pass: 0.45,
            t_maybe: 0.40,
        }
    }
}

// ============================================================================
// SECTION: Semantic Matcher
// ============================================================================

/// Evaluates unstructured criteria against note passages.
pub struct SemanticMatcher<B> {
    /// Injected similarity backend.
    backend: B,
    /// Score thresholds for result banding.
    thresholds: MatchThresholds,
}

impl<B: SimilarityBackend> SemanticMatcher<B> {
    /// Creates a matcher over the given backend and thresholds.
    #[must_use]
    pub const fn new(backend: B, thresholds: MatchThresholds) -> Self {
        Self {
            backend,
            thresholds,
        }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    /// Evaluates a requirement text against the patient's note.
    #[must_use]
    pub fn evaluate(&self, query: &str, profile: &PatientProfile) -> CriterionResult {
        if !profile.has_note() {
            return CriterionResult::maybe("no note data available");
        }

        let mut best: f64 = 0.0;
        for passage in segment_passages(&profile.note_text) {
            match self.backend.similarity(query, passage) {
                Ok(score) => best = best.max(score.clamp(0.0, 1.0)),
                Err(err) => {
                    return CriterionResult::maybe(format!("matcher unavailable: {err}"));
                }
            }
        }

        if best >= self.thresholds.t_pass {
            CriterionResult::pass(format!("semantic match, score={best:.2}"))
        } else if best >= self.thresholds.t_maybe {
            CriterionResult::maybe(format!("weak semantic match, score={best:.2}"))
        } else {
            CriterionResult::maybe(format!("no semantic match, score={best:.2}"))
        }
    }
}

// ============================================================================
// SECTION: Passage Segmentation
// ============================================================================

/// Splits note text into candidate passages at sentence and line boundaries.
#[must_use]
pub fn segment_passages(note: &str) -> Vec<&str> {
    note.split(|c: char| matches!(c, '.' | ';' | '!' | '?' | '\n'))
        .map(str::trim)
        .filter(|passage| !passage.is_empty())
        .collect()
}
