// crates/cohort-screen-core/src/core/profile.rs
// ============================================================================
// Module: Cohort Screen Patient Profiles
// Description: Typed patient field values and unified patient profiles.
// Purpose: Provide the immutable patient snapshot consumed by the engine.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A patient profile is the engine-facing snapshot of one patient: a mapping
//! of structured field names to typed values plus the free-text clinical
//! note. Profiles are built by a data-loading collaborator and are immutable
//! once handed to the engine; a field that could not be derived is simply
//! absent from the mapping, never defaulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;

use crate::core::identifiers::PatientId;

// ============================================================================
// SECTION: Field Values
// ============================================================================

/// Typed value of one structured patient field.
///
/// # Invariants
/// - Numbers are carried as arbitrary-precision JSON numbers; comparisons
///   against criterion operands are decimal-aware, never float round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Numeric field value (age, BMI, lab result).
    Number(Number),
    /// Boolean field value (smoker status, consent flags).
    Bool(bool),
    /// Categorical or free-form text field value (gender, blood group).
    Text(String),
}

impl FieldValue {
    /// Returns the numeric value when this field is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(number) => Some(number),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Returns the boolean value when this field is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Number(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => number.fmt(f),
            Self::Bool(value) => value.fmt(f),
            Self::Text(text) => text.fmt(f),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// ============================================================================
// SECTION: Patient Profile
// ============================================================================

/// Unified patient snapshot consumed by the evaluation engine.
///
/// # Invariants
/// - Immutable once handed to the engine; evaluation never mutates profiles.
/// - Absent fields carry no entry in `fields`; missing data is represented by
///   absence, never by a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Patient identifier.
    pub patient_id: PatientId,
    /// Structured field values keyed by field name.
    pub fields: BTreeMap<String, FieldValue>,
    /// Free-text clinical note content (possibly empty).
    pub note_text: String,
}

impl PatientProfile {
    /// Creates a profile with no structured fields and an empty note.
    #[must_use]
    pub fn new(patient_id: impl Into<PatientId>) -> Self {
        Self {
            patient_id: patient_id.into(),
            fields: BTreeMap::new(),
            note_text: String::new(),
        }
    }

    /// Returns the value of a structured field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Inserts a structured field value, returning the profile for chaining.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the clinical note text, returning the profile for chaining.
    #[must_use]
    pub fn with_note(mut self, note_text: impl Into<String>) -> Self {
        self.note_text = note_text.into();
        self
    }

    /// Returns true when the profile carries any non-whitespace note text.
    #[must_use]
    pub fn has_note(&self) -> bool {
        !self.note_text.trim().is_empty()
    }
}
