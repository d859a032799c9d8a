// crates/cohort-screen-config/src/lib.rs
// ============================================================================
// Module: Cohort Screen Config Library
// Description: Canonical configuration loading and validation.
// Purpose: Expose the validated TOML configuration model for Cohort Screen.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Configuration for Cohort Screen is a single TOML file covering the
//! similarity matcher (backend selection, thresholds, per-call deadline),
//! the decision policy (cutoff, inclusivity), and the batch run (input and
//! output paths, evaluation date). Loading fails closed: out-of-range
//! thresholds, unknown backend names, and malformed dates are rejected
//! before any patient is evaluated.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::BatchConfig;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DecisionConfig;
pub use config::MatcherConfig;
pub use config::ScreenConfig;
pub use config::parse_iso_date;
