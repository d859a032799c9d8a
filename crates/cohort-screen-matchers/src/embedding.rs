// crates/cohort-screen-matchers/src/embedding.rs
// ============================================================================
// Module: Hashed N-Gram Embedding Backend
// Description: Deterministic character-n-gram embeddings with cosine scoring.
// Purpose: Provide an embedding-style backend without an external model.
// Dependencies: cohort-screen-core, sha2
// ============================================================================

//! ## Overview
//! The embedding backend maps text into a fixed-dimension vector by hashing
//! character trigrams into buckets, then scores (query, passage) pairs by
//! cosine similarity of the L2-normalized vectors. Components are
//! non-negative counts, so cosine scores land in `[0, 1]`. Bucketing uses
//! SHA-256, making embeddings stable across runs and platforms. Passage
//! embeddings are invariant across criteria within a run and are resolved
//! through an optional read-through cache keyed by content digest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use cohort_screen_core::EmbeddingCache;
use cohort_screen_core::PassageEmbedding;
use cohort_screen_core::SimilarityBackend;
use cohort_screen_core::SimilarityError;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Embedding vector dimensionality.
const EMBEDDING_DIMS: usize = 256;

/// Character window width for n-gram extraction.
const NGRAM_WIDTH: usize = 3;

// ============================================================================
// SECTION: Backend Implementation
// ============================================================================

/// Deterministic hashed character-n-gram embedding backend.
#[derive(Default)]
pub struct NgramEmbeddingBackend {
    /// Optional read-through cache for computed embeddings.
    cache: Option<Arc<dyn EmbeddingCache>>,
}

impl NgramEmbeddingBackend {
    /// Creates a backend without an embedding cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cache: None,
        }
    }

    /// Creates a backend resolving embeddings through the given cache.
    #[must_use]
    pub fn with_cache(cache: Arc<dyn EmbeddingCache>) -> Self {
        Self {
            cache: Some(cache),
        }
    }

    /// Returns the embedding for a text, through the cache when present.
    fn embedding_for(&self, text: &str) -> PassageEmbedding {
        match &self.cache {
            Some(cache) => cache.get_or_compute(&content_digest(text), &|| embed(text)),
            None => embed(text),
        }
    }
}

impl SimilarityBackend for NgramEmbeddingBackend {
    fn similarity(&self, query: &str, passage: &str) -> Result<f64, SimilarityError> {
        let query_embedding = self.embedding_for(query);
        let passage_embedding = self.embedding_for(passage);
        Ok(cosine(query_embedding.components(), passage_embedding.components()))
    }
}

// ============================================================================
// SECTION: Embedding Helpers
// ============================================================================

/// Embeds text as L2-normalized hashed trigram counts.
fn embed(text: &str) -> PassageEmbedding {
    let mut vector = vec![0.0_f32; EMBEDDING_DIMS];

    let normalized = normalize(text);
    let chars: Vec<char> = normalized.chars().collect();
    for window in chars.windows(NGRAM_WIDTH) {
        let ngram: String = window.iter().collect();
        vector[bucket_for(&ngram)] += 1.0;
    }

    let norm = vector.iter().map(|component| component * component).sum::<f32>().sqrt();
    if norm > 0.0 {
        for component in &mut vector {
            *component /= norm;
        }
    }
    PassageEmbedding::new(vector)
}

/// Lowercases text and collapses non-alphanumeric runs into single spaces.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut pending_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.ends_with(' ') {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out.push(' ');
    out
}

/// Maps an n-gram to its vector bucket through SHA-256.
fn bucket_for(ngram: &str) -> usize {
    let digest = Sha256::digest(ngram.as_bytes());
    let value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    usize::try_from(value).unwrap_or_default() % EMBEDDING_DIMS
}

/// Cosine similarity of two L2-normalized vectors, clamped into [0, 1].
fn cosine(left: &[f32], right: &[f32]) -> f64 {
    let dot = left.iter().zip(right).map(|(a, b)| a * b).sum::<f32>();
    f64::from(dot).clamp(0.0, 1.0)
}

/// Hex-encoded SHA-256 digest used as the cache key for a text.
fn content_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
