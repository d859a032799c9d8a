// crates/cohort-screen-core/src/core/outcome.rs
// ============================================================================
// Module: Cohort Screen Outcomes
// Description: Tri-state criterion outcomes, confidence scores, and verdicts.
// Purpose: Provide closed result types with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Criterion evaluation produces a closed tri-state outcome with an attached
//! reason, never a boolean plus a string. The aggregator's FAIL-dominance rule
//! is implemented as an exhaustive match over [`Outcome`], and the wire-level
//! sentinels (`"MAYBE"` for an uncertain verdict, `"NA"` for a moot score) are
//! produced by the serializers here, not by string inspection downstream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Tri-State Outcome
// ============================================================================

/// Tri-state outcome of one criterion against one patient.
///
/// # Invariants
/// - Represents a closed set: a criterion passes, fails, or is indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Criterion is decisively satisfied.
    Pass,
    /// Criterion is decisively violated.
    Fail,
    /// Criterion cannot be decided from the available data.
    Maybe,
}

impl Outcome {
    /// Returns true if the outcome is `Pass`.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the outcome is `Fail`.
    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns true if the outcome is `Maybe`.
    #[must_use]
    pub const fn is_maybe(self) -> bool {
        matches!(self, Self::Maybe)
    }

    /// Returns the stable wire label for the outcome.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Maybe => "MAYBE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Criterion Result
// ============================================================================

/// Outcome of one criterion with its human-readable reason.
///
/// # Invariants
/// - Produced fresh per (patient, criterion) pair and never mutated.
/// - The reason embeds the observed value(s) or the similarity score so every
///   verdict remains explainable from evidence alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    /// Tri-state outcome.
    pub outcome: Outcome,
    /// Human-readable reason with the observed value or score.
    pub reason: String,
}

impl CriterionResult {
    /// Creates a passing result with the given reason.
    #[must_use]
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Pass,
            reason: reason.into(),
        }
    }

    /// Creates a failing result with the given reason.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            reason: reason.into(),
        }
    }

    /// Creates an indeterminate result with the given reason.
    #[must_use]
    pub fn maybe(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Maybe,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CriterionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.outcome, self.reason)
    }
}

// ============================================================================
// SECTION: Confidence Score
// ============================================================================

/// Confidence score derived from an evidence mapping.
///
/// # Invariants
/// - `Score` carries a value in `[0, 1]`.
/// - `NotApplicable` signals "disqualified, scoring moot", distinct from a
///   scored zero; it serializes as the literal `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceScore {
    /// Mean of per-criterion weights over all criteria.
    Score(f64),
    /// Scoring is moot because at least one criterion failed.
    NotApplicable,
}

impl ConfidenceScore {
    /// Returns the numeric score, if applicable.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Score(score) => Some(score),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score:.2}"),
            Self::NotApplicable => f.write_str("NA"),
        }
    }
}

impl Serialize for ConfidenceScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(score) => serializer.serialize_f64(*score),
            Self::NotApplicable => serializer.serialize_str("NA"),
        }
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Patient-level eligibility verdict.
///
/// # Invariants
/// - `NotEligible` is forced by any FAIL in the evidence mapping.
/// - `Uncertain` serializes as the literal `"MAYBE"`; the other variants
///   serialize as plain booleans under the `is_eligible` wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Patient qualifies with high confidence.
    Eligible,
    /// At least one criterion decisively failed.
    NotEligible,
    /// No criterion failed, but confidence is below the cutoff.
    Uncertain,
}

impl Verdict {
    /// Returns true if the verdict is `Eligible`.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => f.write_str("true"),
            Self::NotEligible => f.write_str("false"),
            Self::Uncertain => f.write_str("MAYBE"),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Eligible => serializer.serialize_bool(true),
            Self::NotEligible => serializer.serialize_bool(false),
            Self::Uncertain => serializer.serialize_str("MAYBE"),
        }
    }
}
