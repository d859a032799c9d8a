// crates/cohort-screen-core/src/core/criterion.rs
// ============================================================================
// Module: Cohort Screen Criterion Model
// Description: Protocol, criterion, and comparison-operator specifications.
// Purpose: Define canonical normalized protocols with validation helpers.
// Dependencies: crate::core::{identifiers, profile}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A protocol is an ordered, read-only sequence of criteria. Structured
//! criteria fully specify one comparison operator and its operand(s);
//! unstructured criteria carry exactly one requirement text used verbatim as
//! the semantic query and as the evidence key. Protocols are validated before
//! any patient is evaluated: a malformed criterion is a fatal
//! [`ProtocolFormatError`], never a silently skipped entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use thiserror::Error;

use crate::core::identifiers::ProtocolId;
use crate::core::profile::FieldValue;

// ============================================================================
// SECTION: Comparison Operators
// ============================================================================

/// Comparison operator applied by a structured criterion.
///
/// # Invariants
/// - Operands are fully specified at construction; evaluation never consults
///   external state to complete an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "snake_case")]
pub enum ComparisonOp {
    /// Inclusive numeric range check: PASS when `low <= value <= high`.
    Range {
        /// Inclusive lower bound.
        low: Number,
        /// Inclusive upper bound.
        high: Number,
    },
    /// Type-aware exact equality against a boolean, numeric, or text value.
    Equals {
        /// Expected field value.
        value: FieldValue,
    },
    /// Strict numeric less-than check against a threshold.
    LessThan {
        /// Exclusive numeric threshold.
        value: Number,
    },
    /// Strict numeric greater-than check against a threshold.
    GreaterThan {
        /// Exclusive numeric threshold.
        value: Number,
    },
}

// ============================================================================
// SECTION: Criteria
// ============================================================================

/// Kind-specific payload of one eligibility criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionKind {
    /// Numeric/categorical check against one structured patient field.
    Structured {
        /// Target structured field name.
        field: String,
        /// Comparison operator and operand(s).
        #[serde(flatten)]
        op: ComparisonOp,
    },
    /// Free-text requirement matched semantically against note passages.
    Unstructured,
}

/// One eligibility criterion from a normalized protocol.
///
/// # Invariants
/// - `text` is stable and used verbatim as the evidence key; for
///   unstructured criteria it is also the semantic query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Stable display text and evidence key.
    pub text: String,
    /// Criterion kind with kind-specific parameters.
    #[serde(flatten)]
    pub kind: CriterionKind,
}

// ============================================================================
// SECTION: Protocol
// ============================================================================

/// Normalized trial protocol: an ordered sequence of criteria.
///
/// # Invariants
/// - Criterion order is preserved in evidence output but does not affect the
///   verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Protocol identifier.
    pub protocol_id: ProtocolId,
    /// Ordered eligibility criteria.
    pub criteria: Vec<Criterion>,
}

impl Protocol {
    /// Validates the protocol invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolFormatError`] when validation fails.
    pub fn validate(&self) -> Result<(), ProtocolFormatError> {
        if self.criteria.is_empty() {
            return Err(ProtocolFormatError::MissingCriteria);
        }

        ensure_criterion_texts(&self.criteria)?;
        ensure_structured_fields(&self.criteria)?;
        ensure_range_bounds(&self.criteria)?;

        Ok(())
    }

    /// Builds a validated protocol from normalized criterion definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolFormatError`] when any definition is malformed or
    /// the resulting protocol fails validation.
    pub fn from_defs(
        protocol_id: impl Into<ProtocolId>,
        defs: Vec<CriterionDef>,
    ) -> Result<Self, ProtocolFormatError> {
        let mut criteria = Vec::with_capacity(defs.len());
        for def in defs {
            criteria.push(def.into_criterion()?);
        }
        let protocol = Self {
            protocol_id: protocol_id.into(),
            criteria,
        };
        protocol.validate()?;
        Ok(protocol)
    }
}

// ============================================================================
// SECTION: Criterion Definitions
// ============================================================================

/// Normalized criterion definition as produced by protocol ingest.
///
/// # Invariants
/// - Field presence requirements depend on `kind` and `operator`; they are
///   enforced by [`CriterionDef::into_criterion`], not by deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDef {
    /// Criterion kind: `structured` or `unstructured`.
    pub kind: String,
    /// Stable display text and evidence key.
    pub text: String,
    /// Target field name (structured criteria only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Operator name: `range`, `equals`, `less_than`, or `greater_than`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Comparison value for `equals`, `less_than`, and `greater_than`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Inclusive lower bound for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Number>,
    /// Inclusive upper bound for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Number>,
}

impl CriterionDef {
    /// Converts the definition into a validated [`Criterion`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolFormatError`] when required fields are missing, the
    /// kind or operator is unknown, or an operand has the wrong type.
    pub fn into_criterion(self) -> Result<Criterion, ProtocolFormatError> {
        match self.kind.as_str() {
            "unstructured" => Ok(Criterion {
                text: self.text,
                kind: CriterionKind::Unstructured,
            }),
            "structured" => self.into_structured(),
            _ => Err(ProtocolFormatError::UnknownKind {
                text: self.text,
                kind: self.kind,
            }),
        }
    }

    /// Converts a structured definition into a criterion.
    fn into_structured(self) -> Result<Criterion, ProtocolFormatError> {
        let Some(field) = self.field else {
            return Err(ProtocolFormatError::MissingTargetField {
                text: self.text,
            });
        };
        let Some(operator) = self.operator else {
            return Err(ProtocolFormatError::MissingOperator {
                text: self.text,
            });
        };

        let op = match operator.as_str() {
            "range" => {
                let low = require_bound(self.low, &self.text, "low")?;
                let high = require_bound(self.high, &self.text, "high")?;
                ComparisonOp::Range {
                    low,
                    high,
                }
            }
            "equals" => ComparisonOp::Equals {
                value: equals_operand(self.value, &self.text)?,
            },
            "less_than" => ComparisonOp::LessThan {
                value: numeric_operand(self.value, &self.text)?,
            },
            "greater_than" => ComparisonOp::GreaterThan {
                value: numeric_operand(self.value, &self.text)?,
            },
            _ => {
                return Err(ProtocolFormatError::UnknownOperator {
                    text: self.text,
                    operator,
                });
            }
        };

        Ok(Criterion {
            text: self.text,
            kind: CriterionKind::Structured {
                field,
                op,
            },
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Protocol validation errors.
///
/// # Invariants
/// - Any variant is fatal for the whole protocol; no partial evaluation of a
///   malformed protocol ever takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolFormatError {
    /// Protocol contains no criteria.
    #[error("protocol must define at least one criterion")]
    MissingCriteria,
    /// A criterion carries empty display text.
    #[error("criterion text must not be empty")]
    EmptyCriterionText,
    /// Two criteria share the same display text.
    #[error("duplicate criterion text: {0}")]
    DuplicateCriterionText(String),
    /// Criterion declares an unknown kind.
    #[error("criterion `{text}` declares unknown kind: {kind}")]
    UnknownKind {
        /// Criterion display text.
        text: String,
        /// The unrecognized kind name.
        kind: String,
    },
    /// Structured criterion declares an unknown operator.
    #[error("criterion `{text}` declares unknown operator: {operator}")]
    UnknownOperator {
        /// Criterion display text.
        text: String,
        /// The unrecognized operator name.
        operator: String,
    },
    /// Structured criterion is missing its target field name.
    #[error("structured criterion `{text}` is missing its target field")]
    MissingTargetField {
        /// Criterion display text.
        text: String,
    },
    /// Structured criterion carries an empty target field name.
    #[error("structured criterion `{text}` has an empty target field")]
    EmptyTargetField {
        /// Criterion display text.
        text: String,
    },
    /// Structured criterion is missing its operator.
    #[error("structured criterion `{text}` is missing its operator")]
    MissingOperator {
        /// Criterion display text.
        text: String,
    },
    /// Structured criterion is missing a required operand.
    #[error("criterion `{text}` is missing operand `{operand}`")]
    MissingOperand {
        /// Criterion display text.
        text: String,
        /// Name of the missing operand.
        operand: String,
    },
    /// Operand has a type the operator cannot compare.
    #[error("criterion `{text}` requires a numeric operand for `{operand}`")]
    NonNumericOperand {
        /// Criterion display text.
        text: String,
        /// Name of the offending operand.
        operand: String,
    },
    /// Equality operand is not a boolean, number, or string.
    #[error("criterion `{text}` operand `{operand}` must be a boolean, number, or string")]
    UnsupportedOperand {
        /// Criterion display text.
        text: String,
        /// Name of the offending operand.
        operand: String,
    },
    /// Range criterion declares a lower bound above its upper bound.
    #[error("criterion `{text}` has an inverted range: {low} exceeds {high}")]
    InvertedRange {
        /// Criterion display text.
        text: String,
        /// Declared lower bound.
        low: Number,
        /// Declared upper bound.
        high: Number,
    },
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures criterion texts are non-empty and unique within the protocol.
fn ensure_criterion_texts(criteria: &[Criterion]) -> Result<(), ProtocolFormatError> {
    for (index, criterion) in criteria.iter().enumerate() {
        if criterion.text.trim().is_empty() {
            return Err(ProtocolFormatError::EmptyCriterionText);
        }
        if criteria.iter().skip(index + 1).any(|other| other.text == criterion.text) {
            return Err(ProtocolFormatError::DuplicateCriterionText(criterion.text.clone()));
        }
    }
    Ok(())
}

/// Ensures structured criteria name a non-empty target field.
fn ensure_structured_fields(criteria: &[Criterion]) -> Result<(), ProtocolFormatError> {
    for criterion in criteria {
        if let CriterionKind::Structured {
            field, ..
        } = &criterion.kind
            && field.trim().is_empty()
        {
            return Err(ProtocolFormatError::EmptyTargetField {
                text: criterion.text.clone(),
            });
        }
    }
    Ok(())
}

/// Ensures range criteria declare `low <= high`, decimal-aware.
fn ensure_range_bounds(criteria: &[Criterion]) -> Result<(), ProtocolFormatError> {
    for criterion in criteria {
        if let CriterionKind::Structured {
            op: ComparisonOp::Range {
                low,
                high,
            },
            ..
        } = &criterion.kind
            && crate::runtime::comparator::decimal_cmp(low, high)
                .is_some_and(std::cmp::Ordering::is_gt)
        {
            return Err(ProtocolFormatError::InvertedRange {
                text: criterion.text.clone(),
                low: low.clone(),
                high: high.clone(),
            });
        }
    }
    Ok(())
}

/// Extracts a required numeric range bound.
fn require_bound(
    bound: Option<Number>,
    text: &str,
    operand: &str,
) -> Result<Number, ProtocolFormatError> {
    bound.ok_or_else(|| ProtocolFormatError::MissingOperand {
        text: text.to_string(),
        operand: operand.to_string(),
    })
}

/// Extracts the expected value operand for an equality criterion.
fn equals_operand(
    value: Option<serde_json::Value>,
    text: &str,
) -> Result<FieldValue, ProtocolFormatError> {
    let value = value.ok_or_else(|| ProtocolFormatError::MissingOperand {
        text: text.to_string(),
        operand: "value".to_string(),
    })?;
    match value {
        serde_json::Value::Bool(flag) => Ok(FieldValue::Bool(flag)),
        serde_json::Value::Number(number) => Ok(FieldValue::Number(number)),
        serde_json::Value::String(string) => Ok(FieldValue::Text(string)),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(ProtocolFormatError::UnsupportedOperand {
                text: text.to_string(),
                operand: "value".to_string(),
            })
        }
    }
}

/// Extracts a required numeric threshold operand.
fn numeric_operand(
    value: Option<serde_json::Value>,
    text: &str,
) -> Result<Number, ProtocolFormatError> {
    let value = value.ok_or_else(|| ProtocolFormatError::MissingOperand {
        text: text.to_string(),
        operand: "value".to_string(),
    })?;
    match value {
        serde_json::Value::Number(number) => Ok(number),
        _ => Err(ProtocolFormatError::NonNumericOperand {
            text: text.to_string(),
            operand: "value".to_string(),
        }),
    }
}
