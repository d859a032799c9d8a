// crates/cohort-screen-matchers/src/cache.rs
// ============================================================================
// Module: Note Passage Cache
// Description: Concurrent read-through store for passage embeddings.
// Purpose: Compute each embedding once per batch run and share the result.
// Dependencies: cohort-screen-core
// ============================================================================

//! ## Overview
//! The note passage cache implements the core read-through embedding cache
//! contract over a lock-guarded map keyed by content digest. It is safe for
//! concurrent read-through population when a batch runner parallelizes
//! across patients: readers share the lock, and the first writer for a key
//! wins. It carries no ordering guarantees; correctness never depends on it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::PoisonError;
use std::sync::RwLock;

use cohort_screen_core::EmbeddingCache;
use cohort_screen_core::PassageEmbedding;

// ============================================================================
// SECTION: Cache Implementation
// ============================================================================

/// Concurrent compute-once store for passage embeddings.
#[derive(Debug, Default)]
pub struct NotePassageCache {
    /// Cached embeddings keyed by content digest.
    entries: RwLock<HashMap<String, PassageEmbedding>>,
}

impl NotePassageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached embeddings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no embeddings are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EmbeddingCache for NotePassageCache {
    fn get_or_compute(
        &self,
        key: &str,
        compute: &dyn Fn() -> PassageEmbedding,
    ) -> PassageEmbedding {
        if let Some(embedding) =
            self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key)
        {
            return embedding.clone();
        }

        let embedding = compute();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key.to_string()).or_insert(embedding).clone()
    }
}
