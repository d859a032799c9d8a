// crates/cohort-screen-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cohort Screen Interfaces
// Description: Backend-agnostic interfaces for similarity scoring and caching.
// Purpose: Define the contract surfaces used by the evaluation runtime.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the engine integrates with similarity backends
//! without embedding model-specific details. A backend only has to return a
//! bounded, monotonic similarity score for (query, passage) pairs;
//! implementations must be deterministic for identical inputs so repeated
//! evaluations yield identical records. Backend failures are recoverable:
//! the matcher degrades the affected criterion rather than aborting a batch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// SECTION: Similarity Backend
// ============================================================================

/// Similarity backend errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Any variant degrades the affected criterion to MAYBE; none aborts an
///   evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    /// Backend reported an error.
    #[error("similarity backend error: {0}")]
    Backend(String),
    /// Backend call exceeded its per-call deadline.
    #[error("similarity backend timed out after {0} ms")]
    Timeout(u64),
}

/// Pluggable similarity scorer for (query, passage) pairs.
pub trait SimilarityBackend: Send + Sync {
    /// Scores semantic similarity between a query and a passage.
    ///
    /// Scores are bounded to `[0, 1]` and monotonic: a passage that matches
    /// the query more strongly never scores lower.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError`] when the backend fails or times out.
    fn similarity(&self, query: &str, passage: &str) -> Result<f64, SimilarityError>;
}

impl<T> SimilarityBackend for Arc<T>
where
    T: SimilarityBackend + ?Sized,
{
    fn similarity(&self, query: &str, passage: &str) -> Result<f64, SimilarityError> {
        self.as_ref().similarity(query, passage)
    }
}

// ============================================================================
// SECTION: Embedding Cache
// ============================================================================

/// Embedding vector for one note passage.
///
/// # Invariants
/// - Cheap to clone; the vector is shared, never copied.
#[derive(Debug, Clone, PartialEq)]
pub struct PassageEmbedding {
    /// Embedding components.
    vector: Arc<[f32]>,
}

impl PassageEmbedding {
    /// Creates an embedding from its components.
    #[must_use]
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector: Arc::from(vector),
        }
    }

    /// Returns the embedding components.
    #[must_use]
    pub fn components(&self) -> &[f32] {
        &self.vector
    }
}

/// Read-through, compute-once store for passage embeddings.
///
/// Embedding computation for a note's passages is invariant across criteria
/// within one run, so backends key the cache by a content digest and reuse
/// the stored vector for every criterion. The cache is an optional
/// collaborator: correctness never depends on it, and implementations must be
/// safe for concurrent read-through population when a batch runner
/// parallelizes across patients.
pub trait EmbeddingCache: Send + Sync {
    /// Returns the cached embedding for `key`, computing and storing it on a
    /// miss.
    fn get_or_compute(
        &self,
        key: &str,
        compute: &dyn Fn() -> PassageEmbedding,
    ) -> PassageEmbedding;
}
