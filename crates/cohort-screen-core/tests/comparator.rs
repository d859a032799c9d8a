// crates/cohort-screen-core/tests/comparator.rs
// ============================================================================
// Module: Structured Comparator Tests
// Description: Happy-path and edge-case tests for structured evaluation.
// Purpose: Ensure comparators produce correct tri-state results and reasons.
// Dependencies: cohort-screen-core, serde_json
// ============================================================================
//! ## Overview
//! Validates comparator behavior for numeric, boolean, and text fields,
//! including the missing-data MAYBE policy and decimal-aware ordering.

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

use cohort_screen_core::ComparisonOp;
use cohort_screen_core::FieldValue;
use cohort_screen_core::Outcome;
use cohort_screen_core::PatientProfile;
use cohort_screen_core::runtime::comparator::evaluate_structured;
use serde_json::Number;

fn number(value: f64) -> Number {
    Number::from_f64(value).unwrap()
}

fn profile() -> PatientProfile {
    PatientProfile::new("patient_C001")
        .with_field("age", 54)
        .with_field("is_smoker", false)
        .with_field("gender", "F")
        .with_field("HbA1c", FieldValue::Number(number(7.9)))
}

// ============================================================================
// SECTION: Missing Data
// ============================================================================

/// Verifies that an absent field yields MAYBE for every operator.
#[test]
fn comparator_missing_field_is_maybe() {
    let patient = profile();
    let ops = [
        ComparisonOp::Range {
            low: Number::from(50),
            high: Number::from(70),
        },
        ComparisonOp::Equals {
            value: FieldValue::Bool(false),
        },
        ComparisonOp::LessThan {
            value: number(8.0),
        },
        ComparisonOp::GreaterThan {
            value: number(8.0),
        },
    ];

    for op in &ops {
        let result = evaluate_structured("pack_years", op, &patient);
        assert_eq!(result.outcome, Outcome::Maybe);
        assert_eq!(result.reason, "no data available for pack_years");
    }
}

// ============================================================================
// SECTION: Range
// ============================================================================

/// Verifies inclusive range bounds and the reason wording.
#[test]
fn comparator_range_is_inclusive() {
    let op = ComparisonOp::Range {
        low: Number::from(50),
        high: Number::from(70),
    };

    let in_range = evaluate_structured("age", &op, &profile());
    assert_eq!(in_range.outcome, Outcome::Pass);
    assert_eq!(in_range.reason, "age=54 in range 50-70");

    let at_low = profile().with_field("age", 50);
    assert_eq!(evaluate_structured("age", &op, &at_low).outcome, Outcome::Pass);

    let at_high = profile().with_field("age", 70);
    assert_eq!(evaluate_structured("age", &op, &at_high).outcome, Outcome::Pass);

    let above = profile().with_field("age", 75);
    let result = evaluate_structured("age", &op, &above);
    assert_eq!(result.outcome, Outcome::Fail);
    assert_eq!(result.reason, "age=75 not in range 50-70");
    assert_eq!(result.to_string(), "FAIL (age=75 not in range 50-70)");
}

/// Verifies that a non-numeric value fails a range check decisively.
#[test]
fn comparator_range_rejects_non_numeric() {
    let op = ComparisonOp::Range {
        low: Number::from(50),
        high: Number::from(70),
    };
    let result = evaluate_structured("gender", &op, &profile());
    assert_eq!(result.outcome, Outcome::Fail);
    assert!(result.reason.contains("is not numeric"));
}

// ============================================================================
// SECTION: Equality
// ============================================================================

/// Verifies type-aware boolean equality.
#[test]
fn comparator_boolean_equality() {
    let op = ComparisonOp::Equals {
        value: FieldValue::Bool(false),
    };
    let result = evaluate_structured("is_smoker", &op, &profile());
    assert_eq!(result.outcome, Outcome::Pass);
    assert_eq!(result.reason, "is_smoker=false equals false");

    let smoker = profile().with_field("is_smoker", true);
    let result = evaluate_structured("is_smoker", &op, &smoker);
    assert_eq!(result.outcome, Outcome::Fail);
    assert_eq!(result.reason, "is_smoker=true does not equal false");
}

/// Verifies that a type mismatch is a decisive FAIL, not a coercion.
#[test]
fn comparator_equality_type_mismatch_fails() {
    let op = ComparisonOp::Equals {
        value: FieldValue::Bool(false),
    };
    let result = evaluate_structured("age", &op, &profile());
    assert_eq!(result.outcome, Outcome::Fail);
    assert!(result.reason.contains("mismatched type"));
}

/// Verifies decimal-aware numeric equality across renderings.
#[test]
fn comparator_numeric_equality_is_decimal_aware() {
    let op = ComparisonOp::Equals {
        value: FieldValue::Number(number(8.0)),
    };
    let patient = profile().with_field("HbA1c", FieldValue::Number(Number::from(8)));
    let result = evaluate_structured("HbA1c", &op, &patient);
    assert_eq!(result.outcome, Outcome::Pass);
}

/// Verifies categorical text equality.
#[test]
fn comparator_text_equality() {
    let op = ComparisonOp::Equals {
        value: FieldValue::Text("F".to_string()),
    };
    assert_eq!(evaluate_structured("gender", &op, &profile()).outcome, Outcome::Pass);

    let op = ComparisonOp::Equals {
        value: FieldValue::Text("M".to_string()),
    };
    assert_eq!(evaluate_structured("gender", &op, &profile()).outcome, Outcome::Fail);
}

// ============================================================================
// SECTION: Strict Inequalities
// ============================================================================

/// Verifies strict less-than semantics and the reason wording.
#[test]
fn comparator_less_than_is_strict() {
    let op = ComparisonOp::LessThan {
        value: number(8.0),
    };

    let below = evaluate_structured("HbA1c", &op, &profile());
    assert_eq!(below.outcome, Outcome::Pass);
    assert_eq!(below.reason, "HbA1c=7.9 less than 8.0");

    let equal = profile().with_field("HbA1c", FieldValue::Number(number(8.0)));
    let result = evaluate_structured("HbA1c", &op, &equal);
    assert_eq!(result.outcome, Outcome::Fail);
    assert_eq!(result.reason, "HbA1c=8.0 not less than 8.0");
}

/// Verifies strict greater-than semantics.
#[test]
fn comparator_greater_than_is_strict() {
    let op = ComparisonOp::GreaterThan {
        value: Number::from(10),
    };

    let above = profile().with_field("pack_years", 20);
    assert_eq!(evaluate_structured("pack_years", &op, &above).outcome, Outcome::Pass);

    let equal = profile().with_field("pack_years", 10);
    assert_eq!(evaluate_structured("pack_years", &op, &equal).outcome, Outcome::Fail);
}

/// Verifies identical inputs always produce the identical result.
#[test]
fn comparator_is_deterministic() {
    let op = ComparisonOp::Range {
        low: Number::from(50),
        high: Number::from(70),
    };
    let patient = profile();
    let first = evaluate_structured("age", &op, &patient);
    let second = evaluate_structured("age", &op, &patient);
    assert_eq!(first, second);
}
