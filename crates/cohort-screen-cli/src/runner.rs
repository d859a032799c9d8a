// crates/cohort-screen-cli/src/runner.rs
// ============================================================================
// Module: Batch Runner
// Description: Data-parallel evaluation over patients by protocols.
// Purpose: Drive the engine across the batch with one shared backend.
// Dependencies: cohort-screen-core, rayon
// ============================================================================

//! ## Overview
//! The runner executes the patients by protocols cross-product. Pairs are
//! independent, so patients are evaluated on a rayon worker pool with one
//! shared similarity backend; any embedding cache behind the backend is
//! populated read-through across workers. Records are sorted by patient
//! identifier for stable report output. Evaluation order never affects a
//! verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use cohort_screen_core::DecisionPolicy;
use cohort_screen_core::EngineError;
use cohort_screen_core::EvaluationRecord;
use cohort_screen_core::MatchThresholds;
use cohort_screen_core::PatientProfile;
use cohort_screen_core::Protocol;
use cohort_screen_core::ProtocolId;
use cohort_screen_core::ScreeningEngine;
use cohort_screen_core::SemanticMatcher;
use cohort_screen_core::SimilarityBackend;
use rayon::prelude::*;

// ============================================================================
// SECTION: Batch Outcomes
// ============================================================================

/// Evaluation records for one protocol across the patient set.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Protocol identifier.
    pub protocol_id: ProtocolId,
    /// Records sorted by patient identifier.
    pub records: Vec<EvaluationRecord>,
}

// ============================================================================
// SECTION: Batch Execution
// ============================================================================

/// Evaluates every patient against every protocol.
///
/// # Errors
///
/// Returns [`EngineError`] when a protocol fails validation at engine
/// construction; already-validated protocols never trigger this.
pub fn run_batch(
    protocols: &[Protocol],
    patients: &[PatientProfile],
    backend: &Arc<dyn SimilarityBackend>,
    thresholds: MatchThresholds,
    policy: DecisionPolicy,
) -> Result<Vec<BatchOutcome>, EngineError> {
    let mut outcomes = Vec::with_capacity(protocols.len());
    for protocol in protocols {
        let matcher = SemanticMatcher::new(Arc::clone(backend), thresholds);
        let engine = ScreeningEngine::new(protocol.clone(), matcher, policy)?;

        let mut records: Vec<EvaluationRecord> =
            patients.par_iter().map(|patient| engine.evaluate_patient(patient)).collect();
        records.sort_by(|left, right| left.patient_id.cmp(&right.patient_id));

        outcomes.push(BatchOutcome {
            protocol_id: protocol.protocol_id.clone(),
            records,
        });
    }
    Ok(outcomes)
}
