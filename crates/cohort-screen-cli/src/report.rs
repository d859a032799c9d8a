// crates/cohort-screen-cli/src/report.rs
// ============================================================================
// Module: Report Writer
// Description: Per-protocol JSON reports and writer-based summaries.
// Purpose: Emit evaluation records in the stable wire shape.
// Dependencies: cohort-screen-core, serde_json
// ============================================================================

//! ## Overview
//! Reports serialize evaluation records in the stable wire shape, one JSON
//! file per protocol, named after the protocol identifier. Summaries are
//! written through a caller-supplied writer so output stays testable and
//! never goes through print macros.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::runner::BatchOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Report writing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ReportError {
    /// I/O failure while writing a report.
    #[error("report io error: {0}")]
    Io(String),
    /// Records failed to serialize.
    #[error("report serialization error: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Report Writing
// ============================================================================

/// Writes one protocol's records as `<output_dir>/<protocol_id>.json`.
///
/// # Errors
///
/// Returns [`ReportError`] when the output directory cannot be created or
/// the file cannot be written.
pub fn write_protocol_report(
    output_dir: &Path,
    outcome: &BatchOutcome,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_dir).map_err(|err| ReportError::Io(err.to_string()))?;

    let path = output_dir.join(format!("{}.json", outcome.protocol_id));
    let json = serde_json::to_vec_pretty(&outcome.records)
        .map_err(|err| ReportError::Serialize(err.to_string()))?;
    fs::write(&path, json).map_err(|err| ReportError::Io(err.to_string()))?;
    Ok(path)
}

/// Writes a one-line-per-patient summary for a protocol outcome.
///
/// # Errors
///
/// Returns the underlying I/O error when the writer fails.
pub fn write_summary<W: Write>(writer: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
    writeln!(
        writer,
        "{}: {} patients evaluated",
        outcome.protocol_id,
        outcome.records.len()
    )?;
    for record in &outcome.records {
        writeln!(
            writer,
            "  {} eligible={} confidence={}",
            record.patient_id, record.verdict, record.confidence_score
        )?;
    }
    Ok(())
}
