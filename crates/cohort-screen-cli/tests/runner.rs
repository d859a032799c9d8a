// crates/cohort-screen-cli/tests/runner.rs
// ============================================================================
// Module: Batch Runner Tests
// Description: End-to-end batch evaluation and report-writing tests.
// Purpose: Ensure the cross-product runs deterministically with stable output.
// Dependencies: cohort-screen-cli, cohort-screen-core, cohort-screen-matchers, tempfile
// ============================================================================
//! ## Overview
//! Drives the parallel batch runner over inline patients and protocols with
//! a real lexical backend, then checks record ordering, verdicts, and the
//! JSON report files.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;

use cohort_screen_cli::run_batch;
use cohort_screen_cli::write_protocol_report;
use cohort_screen_cli::write_summary;
use cohort_screen_core::ComparisonOp;
use cohort_screen_core::ConfidenceScore;
use cohort_screen_core::Criterion;
use cohort_screen_core::CriterionKind;
use cohort_screen_core::DecisionPolicy;
use cohort_screen_core::MatchThresholds;
use cohort_screen_core::PatientProfile;
use cohort_screen_core::Protocol;
use cohort_screen_core::Verdict;
use cohort_screen_matchers::BackendKind;
use cohort_screen_matchers::build_backend;
use serde_json::Number;

fn protocol(id: &str) -> Protocol {
    Protocol {
        protocol_id: id.into(),
        criteria: vec![
            Criterion {
                text: "Patient must be between 50 and 70 years of age.".to_string(),
                kind: CriterionKind::Structured {
                    field: "age".to_string(),
                    op: ComparisonOp::Range {
                        low: Number::from(50),
                        high: Number::from(70),
                    },
                },
            },
            Criterion {
                text: "Non-smoker for at least 5 years.".to_string(),
                kind: CriterionKind::Unstructured,
            },
        ],
    }
}

fn patients() -> Vec<PatientProfile> {
    vec![
        PatientProfile::new("patient_C004")
            .with_field("age", 75)
            .with_note("Smokes a pack a day."),
        PatientProfile::new("patient_C001")
            .with_field("age", 54)
            .with_note("Non smoker for over ten years."),
    ]
}

// ============================================================================
// SECTION: Batch Evaluation
// ============================================================================

/// Verifies verdicts across the batch with records sorted by patient id.
#[test]
fn runner_evaluates_cross_product() {
    let backend = build_backend(BackendKind::Lexical, None);
    let outcomes = run_batch(
        &[protocol("protocol_onc_001")],
        &patients(),
        &backend,
        MatchThresholds::default(),
        DecisionPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert_eq!(outcome.protocol_id.as_str(), "protocol_onc_001");

    let ids: Vec<&str> =
        outcome.records.iter().map(|record| record.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["patient_C001", "patient_C004"]);

    let eligible = &outcome.records[0];
    assert_eq!(eligible.verdict, Verdict::Eligible);
    assert_eq!(eligible.confidence_score, ConfidenceScore::Score(1.0));

    let disqualified = &outcome.records[1];
    assert_eq!(disqualified.verdict, Verdict::NotEligible);
    assert_eq!(disqualified.confidence_score, ConfidenceScore::NotApplicable);
}

/// Verifies one protocol per outcome across multiple protocols.
#[test]
fn runner_handles_multiple_protocols() {
    let backend = build_backend(BackendKind::Embedding, None);
    let outcomes = run_batch(
        &[protocol("protocol_onc_001"), protocol("protocol_onc_002")],
        &patients(),
        &backend,
        MatchThresholds::default(),
        DecisionPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|outcome| outcome.records.len() == 2));
}

/// Verifies repeated runs produce identical outcomes.
#[test]
fn runner_is_deterministic() {
    let backend = build_backend(BackendKind::Lexical, None);
    let first = run_batch(
        &[protocol("protocol_onc_001")],
        &patients(),
        &backend,
        MatchThresholds::default(),
        DecisionPolicy::default(),
    )
    .unwrap();
    let second = run_batch(
        &[protocol("protocol_onc_001")],
        &patients(),
        &backend,
        MatchThresholds::default(),
        DecisionPolicy::default(),
    )
    .unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Verifies report files land under the output directory in wire shape.
#[test]
fn runner_reports_wire_shape() {
    let backend = build_backend(BackendKind::Lexical, None);
    let outcomes = run_batch(
        &[protocol("protocol_onc_001")],
        &patients(),
        &backend,
        MatchThresholds::default(),
        DecisionPolicy::default(),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("outputs");
    let path = write_protocol_report(&output_dir, &outcomes[0]).unwrap();
    assert!(path.ends_with("protocol_onc_001.json"));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"patient_id\": \"patient_C004\""));
    assert!(text.contains("\"is_eligible\": false"));
    assert!(text.contains("\"confidence_score\": \"NA\""));
    assert!(text.contains("FAIL (age=75 not in range 50-70)"));

    let mut summary = Vec::new();
    write_summary(&mut summary, &outcomes[0]).unwrap();
    let summary = String::from_utf8(summary).unwrap();
    assert!(summary.starts_with("protocol_onc_001: 2 patients evaluated"));
    assert!(summary.contains("patient_C004 eligible=false confidence=NA"));
}
