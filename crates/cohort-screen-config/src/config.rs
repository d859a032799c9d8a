// crates/cohort-screen-config/src/config.rs
// ============================================================================
// Module: Cohort Screen Configuration
// Description: Configuration loading and validation for Cohort Screen.
// Purpose: Provide strict, fail-closed config parsing with typed accessors.
// Dependencies: cohort-screen-core, cohort-screen-matchers, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a size limit and validated
//! as a whole: every violation surfaces as a distinct [`ConfigError`]
//! variant so tests can probe boundary behavior at the thresholds directly.
//! Defaults mirror the core `Default` implementations, and validated
//! sections convert into the core runtime types through typed accessors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cohort_screen_core::DecisionPolicy;
use cohort_screen_core::MatchThresholds;
use cohort_screen_matchers::BackendKind;
use cohort_screen_matchers::UnknownBackendError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cohort-screen.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "COHORT_SCREEN_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Top-level Cohort Screen configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenConfig {
    /// Semantic matcher configuration.
    #[serde(default)]
    pub matcher: MatcherConfig,
    /// Decision policy configuration.
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Batch run configuration; required for the `run` command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchConfig>,
}

/// Semantic matcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Similarity backend name (`lexical` or `embedding`).
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Minimum score for a PASS.
    #[serde(default = "default_t_pass")]
    pub t_pass: f64,
    /// Minimum score for a weak-match MAYBE reason.
    #[serde(default = "default_t_maybe")]
    pub t_maybe: f64,
    /// Optional per-call backend deadline in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            t_pass: default_t_pass(),
            t_maybe: default_t_maybe(),
            timeout_ms: None,
        }
    }
}

/// Decision policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// High-confidence cutoff for the eligible verdict.
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Whether a score exactly at the cutoff counts as eligible.
    #[serde(default)]
    pub inclusive: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            inclusive: false,
        }
    }
}

/// Batch run inputs and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Patient demographics CSV path.
    pub patients_csv: PathBuf,
    /// Lab results CSV path.
    pub labs_csv: PathBuf,
    /// Directory of per-patient clinical note files.
    pub notes_dir: PathBuf,
    /// Directory of protocol YAML files.
    pub protocols_dir: PathBuf,
    /// Directory receiving per-protocol JSON reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Evaluation date (`YYYY-MM-DD`) anchoring age derivation.
    pub evaluation_date: String,
}

/// Default similarity backend name.
fn default_backend() -> String {
    BackendKind::Lexical.name().to_string()
}

/// Default PASS threshold, mirroring the core default.
fn default_t_pass() -> f64 {
    MatchThresholds::default().t_pass
}

/// Default weak-match threshold, mirroring the core default.
fn default_t_maybe() -> f64 {
    MatchThresholds::default().t_maybe
}

/// Default eligibility cutoff, mirroring the core default.
fn default_cutoff() -> f64 {
    DecisionPolicy::default().cutoff
}

/// Default report output directory.
fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; one variant per
///   violation class.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file exceeds the size limit.
    #[error("config file too large: {actual_bytes} > {max_bytes}")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        actual_bytes: u64,
    },
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Similarity threshold outside `[0, 1]`.
    #[error("matcher threshold {name} out of range: {value}")]
    ThresholdOutOfRange {
        /// Threshold field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Weak-match threshold does not lie below the PASS threshold.
    #[error("matcher thresholds inverted: t_maybe {t_maybe} must be below t_pass {t_pass}")]
    InvertedThresholds {
        /// Configured weak-match threshold.
        t_maybe: f64,
        /// Configured PASS threshold.
        t_pass: f64,
    },
    /// Unknown similarity backend name.
    #[error(transparent)]
    UnknownBackend(#[from] UnknownBackendError),
    /// Zero-length backend deadline.
    #[error("matcher timeout_ms must be positive")]
    ZeroTimeout,
    /// Eligibility cutoff outside `[0, 1]`.
    #[error("decision cutoff out of range: {value}")]
    CutoffOutOfRange {
        /// Offending value.
        value: f64,
    },
    /// Batch path is empty.
    #[error("batch path {field} must not be empty")]
    EmptyPath {
        /// Batch field name.
        field: &'static str,
    },
    /// Evaluation date is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid evaluation date: {value}")]
    InvalidEvaluationDate {
        /// Offending value.
        value: String,
    },
    /// Batch section is required but missing.
    #[error("config has no [batch] section")]
    MissingBatch,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ScreenConfig {
    /// Loads and validates configuration from a path, the
    /// `COHORT_SCREEN_CONFIG` environment variable, or the default filename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_path(path);
        let metadata = fs::metadata(&path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                max_bytes: MAX_CONFIG_FILE_SIZE,
                actual_bytes: metadata.len(),
            });
        }
        let text = fs::read_to_string(&path).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] violation encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matcher.validate()?;
        self.decision.validate()?;
        if let Some(batch) = &self.batch {
            batch.validate()?;
        }
        Ok(())
    }

    /// Returns the validated match thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            t_pass: self.matcher.t_pass,
            t_maybe: self.matcher.t_maybe,
        }
    }

    /// Returns the validated decision policy.
    #[must_use]
    pub const fn policy(&self) -> DecisionPolicy {
        DecisionPolicy {
            cutoff: self.decision.cutoff,
            inclusive: self.decision.inclusive,
        }
    }

    /// Resolves the configured similarity backend kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownBackend`] when the name is not
    /// registered.
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        Ok(BackendKind::from_name(&self.matcher.backend)?)
    }

    /// Returns the batch section or a missing-section error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBatch`] when no `[batch]` section is
    /// configured.
    pub fn batch(&self) -> Result<&BatchConfig, ConfigError> {
        self.batch.as_ref().ok_or(ConfigError::MissingBatch)
    }
}

impl MatcherConfig {
    /// Validates backend name, thresholds, and deadline.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] violation encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        BackendKind::from_name(&self.backend)?;
        ensure_unit_range("t_pass", self.t_pass)?;
        ensure_unit_range("t_maybe", self.t_maybe)?;
        if self.t_maybe >= self.t_pass {
            return Err(ConfigError::InvertedThresholds {
                t_maybe: self.t_maybe,
                t_pass: self.t_pass,
            });
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl DecisionConfig {
    /// Validates the cutoff range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CutoffOutOfRange`] when the cutoff leaves
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0 ..= 1.0).contains(&self.cutoff) || !self.cutoff.is_finite() {
            return Err(ConfigError::CutoffOutOfRange {
                value: self.cutoff,
            });
        }
        Ok(())
    }
}

impl BatchConfig {
    /// Validates batch paths and the evaluation date.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] violation encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_path("patients_csv", &self.patients_csv)?;
        ensure_path("labs_csv", &self.labs_csv)?;
        ensure_path("notes_dir", &self.notes_dir)?;
        ensure_path("protocols_dir", &self.protocols_dir)?;
        ensure_path("output_dir", &self.output_dir)?;
        self.evaluation_date()?;
        Ok(())
    }

    /// Parses the evaluation date as a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEvaluationDate`] when the value is not
    /// a valid `YYYY-MM-DD` date.
    pub fn evaluation_date(&self) -> Result<Date, ConfigError> {
        parse_iso_date(&self.evaluation_date).ok_or_else(|| ConfigError::InvalidEvaluationDate {
            value: self.evaluation_date.clone(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

/// Ensures a threshold value lies in `[0, 1]`.
fn ensure_unit_range(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0 ..= 1.0).contains(&value) || !value.is_finite() {
        return Err(ConfigError::ThresholdOutOfRange {
            name,
            value,
        });
    }
    Ok(())
}

/// Ensures a batch path is non-empty.
fn ensure_path(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath {
            field,
        });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date into a calendar date.
pub fn parse_iso_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = time::Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
