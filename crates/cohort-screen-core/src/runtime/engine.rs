// crates/cohort-screen-core/src/runtime/engine.rs
// ============================================================================
// Module: Cohort Screen Evaluation Engine
// Description: Protocol-order dispatch loop over patient profiles.
// Purpose: Produce one complete evaluation record per (patient, protocol) pair.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The screening engine is the single canonical evaluation path. The protocol
//! is validated once at construction: a malformed protocol is rejected before
//! any patient is evaluated, never partially applied. Evaluation itself is
//! total: every criterion produces exactly one result, in protocol order,
//! with structured criteria dispatched to the comparator and unstructured
//! criteria to the semantic matcher.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CriterionKind;
use crate::core::EvaluationRecord;
use crate::core::EvidenceEntry;
use crate::core::PatientProfile;
use crate::core::Protocol;
use crate::core::ProtocolFormatError;
use crate::interfaces::SimilarityBackend;
use crate::runtime::aggregate::DecisionPolicy;
use crate::runtime::aggregate::decide;
use crate::runtime::comparator::evaluate_structured;
use crate::runtime::matcher::SemanticMatcher;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Engine construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Protocol failed validation; no patient was evaluated.
    #[error("invalid protocol: {0}")]
    InvalidProtocol(#[from] ProtocolFormatError),
}

// ============================================================================
// SECTION: Screening Engine
// ============================================================================

/// Evaluation driver binding one protocol to a matcher and decision policy.
pub struct ScreeningEngine<B> {
    /// Validated protocol under evaluation.
    protocol: Protocol,
    /// Semantic matcher for unstructured criteria.
    matcher: SemanticMatcher<B>,
    /// Decision policy applied to aggregated evidence.
    policy: DecisionPolicy,
}

impl<B: SimilarityBackend> ScreeningEngine<B> {
    /// Creates an engine after validating the protocol.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidProtocol`] when the protocol fails
    /// validation.
    pub fn new(
        protocol: Protocol,
        matcher: SemanticMatcher<B>,
        policy: DecisionPolicy,
    ) -> Result<Self, EngineError> {
        protocol.validate()?;
        Ok(Self {
            protocol,
            matcher,
            policy,
        })
    }

    /// Returns the protocol under evaluation.
    #[must_use]
    pub const fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Returns the configured decision policy.
    #[must_use]
    pub const fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Evaluates one patient against the protocol.
    ///
    /// Produces exactly one evidence entry per criterion, in protocol order,
    /// then derives the confidence score and verdict from the full mapping.
    #[must_use]
    pub fn evaluate_patient(&self, profile: &PatientProfile) -> EvaluationRecord {
        let mut evidence = Vec::with_capacity(self.protocol.criteria.len());
        for criterion in &self.protocol.criteria {
            let result = match &criterion.kind {
                CriterionKind::Structured {
                    field,
                    op,
                } => evaluate_structured(field, op, profile),
                CriterionKind::Unstructured => self.matcher.evaluate(&criterion.text, profile),
            };
            evidence.push(EvidenceEntry::new(criterion.text.clone(), result));
        }

        let (confidence_score, verdict) = decide(&evidence, &self.policy);
        EvaluationRecord {
            patient_id: profile.patient_id.clone(),
            evidence,
            confidence_score,
            verdict,
        }
    }
}
