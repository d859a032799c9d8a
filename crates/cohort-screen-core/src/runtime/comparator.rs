// crates/cohort-screen-core/src/runtime/comparator.rs
// ============================================================================
// Module: Cohort Screen Structured Comparator
// Description: Comparator evaluation for structured criteria.
// Purpose: Convert patient field values into tri-state criterion results.
// Dependencies: crate::core, bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! The structured comparator evaluates one structured criterion against one
//! patient's typed fields. A missing field yields MAYBE with a "no data"
//! reason; missing data is never treated as FAIL. Every present value is
//! decisively PASS or FAIL. Numeric ordering is decimal-aware: operands and
//! observed values are compared through `BigDecimal`, never a float
//! round-trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;

use crate::core::ComparisonOp;
use crate::core::CriterionResult;
use crate::core::FieldValue;
use crate::core::PatientProfile;

// ============================================================================
// SECTION: Comparator Evaluation
// ============================================================================

/// Evaluates a structured criterion against a patient profile.
#[must_use]
pub fn evaluate_structured(
    field: &str,
    op: &ComparisonOp,
    profile: &PatientProfile,
) -> CriterionResult {
    let Some(observed) = profile.field(field) else {
        return CriterionResult::maybe(format!("no data available for {field}"));
    };

    match op {
        ComparisonOp::Range {
            low,
            high,
        } => evaluate_range(field, observed, low, high),
        ComparisonOp::Equals {
            value,
        } => evaluate_equals(field, observed, value),
        ComparisonOp::LessThan {
            value,
        } => evaluate_ordering(field, observed, value, Ordering::Less),
        ComparisonOp::GreaterThan {
            value,
        } => evaluate_ordering(field, observed, value, Ordering::Greater),
    }
}

/// Evaluates an inclusive numeric range criterion.
fn evaluate_range(
    field: &str,
    observed: &FieldValue,
    low: &Number,
    high: &Number,
) -> CriterionResult {
    let Some(value) = observed.as_number() else {
        return CriterionResult::fail(format!(
            "{field}={observed} is not numeric, expected value in range {low}-{high}"
        ));
    };

    let in_range = decimal_cmp(value, low).is_some_and(Ordering::is_ge)
        && decimal_cmp(value, high).is_some_and(Ordering::is_le);
    if in_range {
        CriterionResult::pass(format!("{field}={value} in range {low}-{high}"))
    } else {
        CriterionResult::fail(format!("{field}={value} not in range {low}-{high}"))
    }
}

/// Evaluates a type-aware equality criterion.
fn evaluate_equals(
    field: &str,
    observed: &FieldValue,
    expected: &FieldValue,
) -> CriterionResult {
    let matches = match (observed, expected) {
        (FieldValue::Number(actual), FieldValue::Number(target)) => {
            decimal_cmp(actual, target).is_some_and(Ordering::is_eq)
        }
        (FieldValue::Bool(actual), FieldValue::Bool(target)) => actual == target,
        (FieldValue::Text(actual), FieldValue::Text(target)) => actual == target,
        _ => {
            return CriterionResult::fail(format!(
                "{field}={observed} has mismatched type, expected {expected}"
            ));
        }
    };

    if matches {
        CriterionResult::pass(format!("{field}={observed} equals {expected}"))
    } else {
        CriterionResult::fail(format!("{field}={observed} does not equal {expected}"))
    }
}

/// Evaluates a strict inequality criterion against a numeric threshold.
fn evaluate_ordering(
    field: &str,
    observed: &FieldValue,
    threshold: &Number,
    expect: Ordering,
) -> CriterionResult {
    let relation = if expect == Ordering::Less { "less than" } else { "greater than" };

    let Some(value) = observed.as_number() else {
        return CriterionResult::fail(format!(
            "{field}={observed} is not numeric, expected value {relation} {threshold}"
        ));
    };

    if decimal_cmp(value, threshold).is_some_and(|ordering| ordering == expect) {
        CriterionResult::pass(format!("{field}={value} {relation} {threshold}"))
    } else {
        CriterionResult::fail(format!("{field}={value} not {relation} {threshold}"))
    }
}

// ============================================================================
// SECTION: Decimal Helpers
// ============================================================================

/// Orders numeric JSON values using decimal-aware comparison.
pub(crate) fn decimal_cmp(left: &Number, right: &Number) -> Option<Ordering> {
    let left = decimal_from_number(left)?;
    let right = decimal_from_number(right)?;
    Some(left.cmp(&right))
}

/// Parses a JSON number into `BigDecimal` with a stable string representation.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    let rendered = number.to_string();
    BigDecimal::from_str(&rendered).ok()
}
