// crates/cohort-screen-matchers/src/registry.rs
// ============================================================================
// Module: Backend Registry
// Description: Name-keyed construction of similarity backends.
// Purpose: Select scoring backends by configuration, not by code change.
// Dependencies: cohort-screen-core, serde, thiserror
// ============================================================================

//! ## Overview
//! The registry maps configured backend names to constructed similarity
//! backends. Unknown names are rejected during configuration validation,
//! before any patient is evaluated. A configured per-call deadline wraps the
//! constructed backend; the embedding backend is built over a shared
//! read-through passage cache.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use cohort_screen_core::SimilarityBackend;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::cache::NotePassageCache;
use crate::deadline::DeadlineBackend;
use crate::embedding::NgramEmbeddingBackend;
use crate::lexical::LexicalBackend;

// ============================================================================
// SECTION: Backend Kinds
// ============================================================================

/// Unknown backend name error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown similarity backend: {0}")]
pub struct UnknownBackendError(pub String);

/// Available similarity backend implementations.
///
/// # Invariants
/// - Names are stable configuration values; adding a variant must not
///   change existing names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Token-overlap baseline with synonyms and negation filtering.
    Lexical,
    /// Hashed character-n-gram embeddings with cosine scoring.
    Embedding,
}

impl BackendKind {
    /// Resolves a configured backend name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownBackendError`] when the name is not registered.
    pub fn from_name(name: &str) -> Result<Self, UnknownBackendError> {
        match name {
            "lexical" => Ok(Self::Lexical),
            "embedding" => Ok(Self::Embedding),
            _ => Err(UnknownBackendError(name.to_string())),
        }
    }

    /// Returns the stable configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Embedding => "embedding",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the configured backend, wrapped with a deadline when one is set.
#[must_use]
pub fn build_backend(kind: BackendKind, timeout_ms: Option<u64>) -> Arc<dyn SimilarityBackend> {
    let backend: Arc<dyn SimilarityBackend> = match kind {
        BackendKind::Lexical => Arc::new(LexicalBackend::default()),
        BackendKind::Embedding => {
            Arc::new(NgramEmbeddingBackend::with_cache(Arc::new(NotePassageCache::new())))
        }
    };

    match timeout_ms {
        Some(timeout_ms) => Arc::new(DeadlineBackend::new(backend, timeout_ms)),
        None => backend,
    }
}
