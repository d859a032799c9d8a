// crates/cohort-screen-cli/src/lib.rs
// ============================================================================
// Module: Cohort Screen CLI Library
// Description: Batch ingest, orchestration, and reporting over the engine.
// Purpose: Reconstruct the data-loading and reporting collaborators.
// Dependencies: cohort-screen-{core, matchers, config}, csv, rayon, serde_yaml
// ============================================================================

//! ## Overview
//! The CLI crate implements the batch surfaces around the evaluation engine:
//! patient and lab CSV ingest with derived fields, YAML protocol ingest into
//! the normalized criterion model, a data-parallel runner over the patients
//! by protocols cross-product, and per-protocol JSON report writing in the
//! stable wire shape. All decision logic stays in the core engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod loader;
pub mod protocols;
pub mod report;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use loader::IngestError;
pub use loader::load_profiles;
pub use protocols::ProtocolIngestError;
pub use protocols::ProtocolLoad;
pub use protocols::load_protocol;
pub use protocols::load_protocols;
pub use report::ReportError;
pub use report::write_protocol_report;
pub use report::write_summary;
pub use runner::BatchOutcome;
pub use runner::run_batch;
