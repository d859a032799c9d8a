// crates/cohort-screen-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Cohort Screen Confidence Aggregation
// Description: Confidence scoring and eligibility decision policy.
// Purpose: Reduce an evidence mapping to a score and a verdict.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The aggregator reduces an ordered evidence mapping to a confidence score
//! and an eligibility verdict. FAIL dominates: any failing criterion forces a
//! not-eligible verdict with a "not applicable" score. With no FAIL present,
//! the score is the unweighted arithmetic mean of per-criterion weights over
//! all criteria, structured and unstructured together. The decision is a pure
//! function of the evidence: identical evidence always yields the identical
//! (score, verdict) pair.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ConfidenceScore;
use crate::core::EvidenceEntry;
use crate::core::Outcome;
use crate::core::Verdict;

// ============================================================================
// SECTION: Weights
// ============================================================================

/// Weight contributed by a PASS outcome to the confidence mean.
pub const PASS_WEIGHT: f64 = 1.0;

/// Weight contributed by a MAYBE outcome to the confidence mean.
pub const MAYBE_WEIGHT: f64 = 0.5;

// ============================================================================
// SECTION: Decision Policy
// ============================================================================

/// High-confidence cutoff turning a score into a verdict.
///
/// # Invariants
/// - `cutoff` lies in `[0, 1]`; enforced by configuration validation.
/// - With `inclusive` false (the default), a score equal to the cutoff is
///   uncertain; the score must strictly exceed the cutoff to be eligible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    /// High-confidence cutoff for the eligible verdict.
    pub cutoff: f64,
    /// Whether a score exactly at the cutoff counts as eligible.
    pub inclusive: bool,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            cutoff: 0.75,
            inclusive: false,
        }
    }
}

impl DecisionPolicy {
    /// Returns true when the score clears the cutoff under this policy.
    #[must_use]
    pub fn clears_cutoff(&self, score: f64) -> bool {
        if self.inclusive { score >= self.cutoff } else { score > self.cutoff }
    }
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Derives the confidence score and verdict for an evidence mapping.
///
/// Empty evidence cannot arise from a validated protocol; it is defined as
/// uncertain with a score of [`MAYBE_WEIGHT`] so the fold stays total.
#[must_use]
pub fn decide(evidence: &[EvidenceEntry], policy: &DecisionPolicy) -> (ConfidenceScore, Verdict) {
    let mut saw_fail = false;
    let mut total = 0.0;
    for entry in evidence {
        match entry.result.outcome {
            Outcome::Fail => saw_fail = true,
            Outcome::Pass => total += PASS_WEIGHT,
            Outcome::Maybe => total += MAYBE_WEIGHT,
        }
    }

    if saw_fail {
        return (ConfidenceScore::NotApplicable, Verdict::NotEligible);
    }
    if evidence.is_empty() {
        return (ConfidenceScore::Score(MAYBE_WEIGHT), Verdict::Uncertain);
    }

    let score = total / evidence.len() as f64;
    let verdict = if policy.clears_cutoff(score) { Verdict::Eligible } else { Verdict::Uncertain };
    (ConfidenceScore::Score(score), verdict)
}
