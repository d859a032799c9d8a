// crates/cohort-screen-core/src/core/record.rs
// ============================================================================
// Module: Cohort Screen Evaluation Records
// Description: Ordered evidence mappings and patient-level evaluation records.
// Purpose: Provide the read-only audit trail produced per (patient, protocol).
// Dependencies: crate::core::{identifiers, outcome}, serde
// ============================================================================

//! ## Overview
//! An evaluation record is the complete audit trail for one patient against
//! one protocol: the ordered evidence mapping, the derived confidence score,
//! and the verdict. Records serialize into the wire shape consumed by report
//! tooling: `patient_id`, `is_eligible` (boolean or `"MAYBE"`),
//! `confidence_score` (decimal or `"NA"`), and `evidence` as an ordered object
//! of `"<PASS|FAIL|MAYBE> (<reason>)"` strings keyed by criterion text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde::ser::SerializeStruct;

use crate::core::identifiers::PatientId;
use crate::core::outcome::ConfidenceScore;
use crate::core::outcome::CriterionResult;
use crate::core::outcome::Verdict;

// ============================================================================
// SECTION: Evidence Entries
// ============================================================================

/// One entry of the ordered evidence mapping.
///
/// # Invariants
/// - `criterion_text` is the criterion's display text, used verbatim as the
///   wire key; texts are unique within one protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceEntry {
    /// Criterion display text and evidence key.
    pub criterion_text: String,
    /// Tri-state result with its reason.
    pub result: CriterionResult,
}

impl EvidenceEntry {
    /// Creates an evidence entry for a criterion result.
    #[must_use]
    pub fn new(criterion_text: impl Into<String>, result: CriterionResult) -> Self {
        Self {
            criterion_text: criterion_text.into(),
            result,
        }
    }
}

// ============================================================================
// SECTION: Evaluation Record
// ============================================================================

/// Complete evaluation of one patient against one protocol.
///
/// # Invariants
/// - Exactly one evidence entry per protocol criterion, in protocol order.
/// - Read-only after construction; identical evidence always serializes to an
///   identical wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    /// Patient identifier.
    pub patient_id: PatientId,
    /// Ordered evidence mapping, one entry per criterion.
    pub evidence: Vec<EvidenceEntry>,
    /// Derived confidence score.
    pub confidence_score: ConfidenceScore,
    /// Derived eligibility verdict.
    pub verdict: Verdict,
}

impl EvaluationRecord {
    /// Returns the evidence result for a criterion text, if present.
    #[must_use]
    pub fn result_for(&self, criterion_text: &str) -> Option<&CriterionResult> {
        self.evidence
            .iter()
            .find(|entry| entry.criterion_text == criterion_text)
            .map(|entry| &entry.result)
    }
}

impl Serialize for EvaluationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("EvaluationRecord", 4)?;
        record.serialize_field("patient_id", &self.patient_id)?;
        record.serialize_field("is_eligible", &self.verdict)?;
        record.serialize_field("confidence_score", &self.confidence_score)?;
        record.serialize_field(
            "evidence",
            &EvidenceWire {
                entries: &self.evidence,
            },
        )?;
        record.end()
    }
}

/// Serializes evidence entries as an ordered map of rendered result strings.
struct EvidenceWire<'a> {
    /// Evidence entries in protocol order.
    entries: &'a [EvidenceEntry],
}

impl Serialize for EvidenceWire<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in self.entries {
            map.serialize_entry(&entry.criterion_text, &entry.result.to_string())?;
        }
        map.end()
    }
}
