// crates/cohort-screen-matchers/tests/registry.rs
// ============================================================================
// Module: Backend Registry Tests
// Description: Name resolution and backend construction tests.
// Purpose: Ensure configured names map to working backends.
// Dependencies: cohort-screen-core, cohort-screen-matchers
// ============================================================================
//! ## Overview
//! Validates backend name resolution, unknown-name rejection, and that
//! constructed backends score through the core interface.

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
    clippy::float_cmp,
    reason = "Test-only output, panic-based assertions, and exact float checks are permitted."
)]

use cohort_screen_core::SimilarityBackend;
use cohort_screen_matchers::BackendKind;
use cohort_screen_matchers::UnknownBackendError;
use cohort_screen_matchers::build_backend;

// ============================================================================
// SECTION: Name Resolution
// ============================================================================

/// Verifies stable backend names resolve round-trip.
#[test]
fn registry_resolves_known_names() {
    assert_eq!(BackendKind::from_name("lexical").unwrap(), BackendKind::Lexical);
    assert_eq!(BackendKind::from_name("embedding").unwrap(), BackendKind::Embedding);
    assert_eq!(BackendKind::Lexical.name(), "lexical");
    assert_eq!(BackendKind::Embedding.name(), "embedding");
}

/// Verifies unknown names are rejected with the offending name.
#[test]
fn registry_rejects_unknown_names() {
    let err = BackendKind::from_name("transformer").unwrap_err();
    assert_eq!(err, UnknownBackendError("transformer".to_string()));
    assert_eq!(err.to_string(), "unknown similarity backend: transformer");
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Verifies constructed backends score through the core interface.
#[test]
fn registry_builds_working_backends() {
    let lexical = build_backend(BackendKind::Lexical, None);
    assert_eq!(lexical.similarity("stable mood", "mood stable").unwrap(), 1.0);

    let embedding = build_backend(BackendKind::Embedding, Some(5000));
    let score = embedding.similarity("stable mood", "stable mood").unwrap();
    assert!(score > 0.999);
}
