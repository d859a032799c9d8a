// crates/cohort-screen-cli/src/protocols.rs
// ============================================================================
// Module: Protocol Ingest
// Description: YAML protocol ingest into the normalized criterion model.
// Purpose: Parse and validate protocol files before any patient is evaluated.
// Dependencies: cohort-screen-core, serde, serde_yaml
// ============================================================================

//! ## Overview
//! Protocol ingest reads YAML files into normalized criterion definitions
//! and converts them into validated core protocols. A malformed protocol is
//! fatal for that file: the format error names the offending criterion, and
//! no partial protocol is ever produced. Directory loading reports per-file
//! failures alongside the successfully loaded protocols so one bad file does
//! not sink a batch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cohort_screen_core::CriterionDef;
use cohort_screen_core::Protocol;
use cohort_screen_core::ProtocolFormatError;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Protocol ingest errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; each names the
///   offending file.
#[derive(Debug, Error)]
pub enum ProtocolIngestError {
    /// I/O failure while reading a protocol file or directory.
    #[error("protocol io error: {0}")]
    Io(String),
    /// YAML parsing failed.
    #[error("protocol parse error in {path}: {message}")]
    Yaml {
        /// Offending file path.
        path: String,
        /// Parser error message.
        message: String,
    },
    /// Parsed protocol failed criterion-model validation.
    #[error("protocol format error in {path}: {source}")]
    Format {
        /// Offending file path.
        path: String,
        /// Underlying format violation.
        #[source]
        source: ProtocolFormatError,
    },
}

// ============================================================================
// SECTION: Protocol Files
// ============================================================================

/// YAML shape of one protocol file.
#[derive(Debug, Deserialize)]
struct ProtocolFile {
    /// Protocol identifier.
    protocol_id: String,
    /// Ordered normalized criterion definitions.
    #[serde(default)]
    criteria: Vec<CriterionDef>,
}

/// Result of loading a protocols directory.
#[derive(Debug)]
pub struct ProtocolLoad {
    /// Successfully loaded protocols, in file-name order.
    pub protocols: Vec<Protocol>,
    /// Per-file failures for files that could not be loaded.
    pub failures: Vec<ProtocolIngestError>,
}

/// Loads and validates one protocol file.
///
/// # Errors
///
/// Returns [`ProtocolIngestError`] when the file cannot be read, parsed, or
/// validated.
pub fn load_protocol(path: &Path) -> Result<Protocol, ProtocolIngestError> {
    let text = fs::read_to_string(path).map_err(|err| ProtocolIngestError::Io(err.to_string()))?;
    let file: ProtocolFile =
        serde_yaml::from_str(&text).map_err(|err| ProtocolIngestError::Yaml {
            path: path.to_string_lossy().into_owned(),
            message: err.to_string(),
        })?;
    Protocol::from_defs(file.protocol_id, file.criteria).map_err(|source| {
        ProtocolIngestError::Format {
            path: path.to_string_lossy().into_owned(),
            source,
        }
    })
}

/// Loads every `.yaml`/`.yml` protocol in a directory, in file-name order.
///
/// # Errors
///
/// Returns [`ProtocolIngestError::Io`] when the directory cannot be read;
/// per-file failures are collected in the returned [`ProtocolLoad`].
pub fn load_protocols(dir: &Path) -> Result<ProtocolLoad, ProtocolIngestError> {
    let entries = fs::read_dir(dir).map_err(|err| ProtocolIngestError::Io(err.to_string()))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ProtocolIngestError::Io(err.to_string()))?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            paths.push(path);
        }
    }
    paths.sort();

    let mut load = ProtocolLoad {
        protocols: Vec::with_capacity(paths.len()),
        failures: Vec::new(),
    };
    for path in paths {
        match load_protocol(&path) {
            Ok(protocol) => load.protocols.push(protocol),
            Err(failure) => load.failures.push(failure),
        }
    }
    Ok(load)
}
